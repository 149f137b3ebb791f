#[cfg(test)]
mod _tests_space_groups {
    use super::super::space_groups::*;
    use super::super::symmetry_operations::SymOp;
    use crate::errors::ReflectionError;
    use nalgebra::Vector3;

    #[test]
    fn test_lookup_ignores_case_and_spacing() {
        let a = SpaceGroup::from_name("P 21 21 21").unwrap();
        let b = SpaceGroup::from_name("p212121").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.number(), 19);
        assert_eq!(a.operations().len(), 4);
    }

    #[test]
    fn test_short_monoclinic_aliases() {
        assert_eq!(SpaceGroup::from_name("P21").unwrap().name(), "P 1 21 1");
        assert_eq!(SpaceGroup::from_name("C 2").unwrap().name(), "C 1 2 1");
    }

    #[test]
    fn test_lookup_by_number() {
        let sg = SpaceGroup::from_number(96).unwrap();
        assert_eq!(sg.name(), "P 43 21 2");
        assert_eq!(sg.laue_class(), LaueClass::TetragonalHigh);
    }

    #[test]
    fn test_unknown_space_group() {
        assert_eq!(
            SpaceGroup::from_name("P 63 2 2").unwrap_err(),
            ReflectionError::UnknownSpaceGroup("P 63 2 2".to_string())
        );
        assert!(SpaceGroup::from_number(230).is_err());
    }

    #[test]
    fn test_every_builtin_group_is_well_formed() {
        for name in builtin_space_group_names() {
            let sg = SpaceGroup::from_name(name).unwrap();
            assert!(sg.operations()[0].is_identity(), "{name}");
            assert_eq!(sg.centering_vectors()[0], Vector3::<i32>::zeros(), "{name}");

            // Closed under composition modulo centering
            let all = sg.all_operations();
            for a in sg.operations() {
                for b in sg.operations() {
                    let product = a.compose(b);
                    assert!(all.contains(&product), "{name}: {} not closed", product.triplet());
                }
            }
        }
    }

    #[test]
    fn test_centering_vectors() {
        let c2 = SpaceGroup::from_name("C 1 2 1").unwrap();
        assert_eq!(
            c2.centering_vectors().to_vec(),
            vec![Vector3::<i32>::zeros(), Vector3::new(12, 12, 0)]
        );
        assert_eq!(c2.all_operations().len(), 4);

        let p1 = SpaceGroup::from_name("P 1").unwrap();
        assert_eq!(p1.centering_vectors().len(), 1);
    }

    #[test]
    fn test_centrosymmetry() {
        assert!(SpaceGroup::from_name("P -1").unwrap().is_centrosymmetric());
        assert!(!SpaceGroup::from_name("P 1 21 1").unwrap().is_centrosymmetric());
    }

    #[test]
    fn test_first_operation_must_be_identity() {
        let ops = vec![SymOp::from_triplet("-x,-y,-z").unwrap(), SymOp::identity()];
        let err = SpaceGroup::new(2, "P -1", ops, &[], LaueClass::Triclinic).unwrap_err();
        assert!(matches!(err, ReflectionError::Validation(_)));
        let info = err.info().unwrap();
        assert_eq!(info.context["spacegroup"], "P -1");
        assert_eq!(info.context["first"], "-x,-y,-z");

        let err = SpaceGroup::new(1, "P 1", Vec::new(), &[], LaueClass::Triclinic).unwrap_err();
        assert!(matches!(err, ReflectionError::Validation(_)));
    }

    #[test]
    fn test_same_group_compares_names() {
        let a = SpaceGroup::from_name("P 2 2 2").unwrap();
        let b = SpaceGroup::from_number(16).unwrap();
        let c = SpaceGroup::from_name("I 2 2 2").unwrap();
        assert!(a.is_same_group(&b));
        assert!(!a.is_same_group(&c));
    }

    #[test]
    fn test_laue_asu_predicates() {
        assert!(LaueClass::Triclinic.contains(&[0, 0, 0]));
        assert!(LaueClass::Triclinic.contains(&[-1, 2, 1]));
        assert!(!LaueClass::Triclinic.contains(&[0, -1, 0]));
        assert!(LaueClass::Monoclinic.contains(&[-1, 0, 1]));
        assert!(!LaueClass::Monoclinic.contains(&[-1, 0, 0]));
        assert!(LaueClass::TetragonalHigh.contains(&[3, 2, 0]));
        assert!(!LaueClass::TetragonalHigh.contains(&[2, 3, 0]));
        assert!(LaueClass::Cubic.contains(&[1, 2, 3]));
        assert!(!LaueClass::Cubic.contains(&[3, 2, 1]));
    }

    #[test]
    fn test_display() {
        let sg = SpaceGroup::from_name("P 4").unwrap();
        assert_eq!(sg.to_string(), "P 4 (#75)");
    }
}
