#[cfg(test)]
mod _tests_classification {
    use super::super::classification::*;
    use super::super::MillerIndex;
    use crate::lattice::UnitCell;
    use crate::symmetries::SpaceGroup;
    use approx::assert_relative_eq;

    fn sg(name: &str) -> SpaceGroup {
        SpaceGroup::from_name(name).unwrap()
    }

    // ==================== Centric reflections ====================

    #[test]
    fn test_every_reflection_is_centric_in_p_minus_1() {
        let mut hkls = Vec::new();
        for h in -3..=3 {
            for k in -3..=3 {
                for l in -3..=3 {
                    hkls.push([h, k, l]);
                }
            }
        }
        assert!(is_centric(&hkls, &sg("P -1")).into_iter().all(|c| c));
    }

    #[test]
    fn test_no_general_reflection_is_centric_in_p1() {
        let hkls = [[1, 2, 3], [-1, 0, 0], [0, 0, 5]];
        assert_eq!(is_centric(&hkls, &sg("P 1")), vec![false, false, false]);
    }

    #[test]
    fn test_monoclinic_centric_zone_is_h0l() {
        let hkls = [[1, 0, 2], [1, 1, 2], [0, 3, 0], [-2, 0, 0]];
        assert_eq!(
            is_centric(&hkls, &sg("P 1 2 1")),
            vec![true, false, false, true]
        );
    }

    // ==================== Systematic absences ====================

    #[test]
    fn test_p212121_screw_axis_absences() {
        let hkls = [[1, 0, 0], [2, 0, 0], [0, 3, 0], [0, 0, 5], [0, 0, 4], [1, 1, 0]];
        assert_eq!(
            is_absent(&hkls, &sg("P 21 21 21")),
            vec![true, false, true, true, false, false]
        );
    }

    #[test]
    fn test_centering_absences() {
        let hkls = [[1, 0, 0], [1, 1, 0], [1, 1, 1], [2, 0, 0]];
        assert_eq!(
            is_absent(&hkls, &sg("I 2 2 2")),
            vec![true, false, true, false]
        );
        // C: h + k odd
        assert_eq!(
            is_absent(&hkls, &sg("C 1 2 1")),
            vec![true, false, false, false]
        );
    }

    #[test]
    fn test_nothing_is_absent_in_p1() {
        let hkls = [[1, 0, 0], [0, 1, 0], [3, 5, 7]];
        assert!(is_absent(&hkls, &sg("P 1")).into_iter().all(|a| !a));
    }

    // ==================== Multiplicity ====================

    #[test]
    fn test_general_position_in_p1_has_multiplicity_one() {
        let hkls = [[1, 2, 3], [-4, 5, -6]];
        assert_eq!(
            compute_structurefactor_multiplicity(&hkls, &sg("P 1"), true),
            vec![1, 1]
        );
    }

    #[test]
    fn test_tetragonal_special_positions() {
        let hkls = [[0, 0, 1], [1, 0, 0], [1, 2, 3]];
        assert_eq!(
            compute_structurefactor_multiplicity(&hkls, &sg("P 4 2 2"), false),
            vec![4, 2, 1]
        );
    }

    #[test]
    fn test_centering_doubles_epsilon() {
        let hkls = [[0, 2, 0], [1, 1, 1]];
        let group = sg("C 1 2 1");
        assert_eq!(
            compute_structurefactor_multiplicity(&hkls, &group, false),
            vec![2, 1]
        );
        assert_eq!(
            compute_structurefactor_multiplicity(&hkls, &group, true),
            vec![4, 2]
        );
    }

    #[test]
    fn test_multiplicity_lower_bound() {
        let hkls: Vec<MillerIndex> = (-5..=5).map(|i| [i, 2 * i + 1, -i]).collect();
        for name in ["P 1", "P 21 21 21", "P 2 3", "I 2 2 2"] {
            let eps = compute_structurefactor_multiplicity(&hkls, &sg(name), true);
            assert!(eps.iter().all(|&e| e >= 1), "{name}");
        }
    }

    // ==================== d-spacing ====================

    #[test]
    fn test_cubic_dhkl_decreases_with_index_length() {
        let cell = UnitCell::new(50.0, 50.0, 50.0, 90.0, 90.0, 90.0).unwrap();
        let mut hkls: Vec<MillerIndex> = Vec::new();
        for h in 0..=4 {
            for k in 0..=4 {
                for l in 1..=4 {
                    hkls.push([h, k, l]);
                }
            }
        }
        let norm = |hkl: &MillerIndex| hkl.iter().map(|x| x * x).sum::<i32>();
        hkls.sort_by_key(norm);

        let d = compute_dhkl(&hkls, &cell).unwrap();
        for i in 1..hkls.len() {
            if norm(&hkls[i]) > norm(&hkls[i - 1]) {
                assert!(d[i] < d[i - 1], "{:?} vs {:?}", hkls[i], hkls[i - 1]);
            } else {
                assert_relative_eq!(d[i], d[i - 1], epsilon = 1e-12);
            }
        }
        assert_relative_eq!(d[0], 50.0, epsilon = 1e-10);
    }

    #[test]
    fn test_triclinic_dhkl_matches_closed_form() {
        let (a, b, c) = (10.0_f64, 12.0_f64, 15.0_f64);
        let (alpha, beta, gamma) = (70.0_f64, 80.0_f64, 100.0_f64);
        let cell = UnitCell::new(a, b, c, alpha, beta, gamma).unwrap();
        let (ca, cb, cg) = (
            alpha.to_radians().cos(),
            beta.to_radians().cos(),
            gamma.to_radians().cos(),
        );
        let (sa, sb, sg) = (
            alpha.to_radians().sin(),
            beta.to_radians().sin(),
            gamma.to_radians().sin(),
        );
        let volume = cell.volume();

        let hkls = [[1, 2, 3], [-2, 1, 0], [0, 0, 1]];
        let d = compute_dhkl(&hkls, &cell).unwrap();
        for (hkl, d) in hkls.iter().zip(d) {
            let (h, k, l) = (f64::from(hkl[0]), f64::from(hkl[1]), f64::from(hkl[2]));
            let inv_d2 = (h * h * b * b * c * c * sa * sa
                + k * k * a * a * c * c * sb * sb
                + l * l * a * a * b * b * sg * sg
                + 2.0 * h * k * a * b * c * c * (ca * cb - cg)
                + 2.0 * k * l * a * a * b * c * (cb * cg - ca)
                + 2.0 * h * l * a * b * b * c * (cg * ca - cb))
                / (volume * volume);
            assert_relative_eq!(d, 1.0 / inv_d2.sqrt(), epsilon = 1e-9);
        }
    }
}
