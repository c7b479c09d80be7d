use proptest::prelude::*;
use recipe_fs::NormalizedPath;

proptest! {
    #[test]
    fn resolved_relative_names_stay_under_root(name in "[a-z][a-z0-9_.-]{0,20}") {
        let root = NormalizedPath::new("/sandbox");
        let resolved = NormalizedPath::resolve(&root, &name);

        prop_assert!(resolved.as_str().starts_with("/sandbox/"));
        prop_assert_eq!(resolved.file_name(), Some(name.as_str()));
    }

    #[test]
    fn normalized_paths_never_contain_backslashes(s in "\\PC*") {
        let path = NormalizedPath::new(&s);
        prop_assert!(!path.as_str().contains('\\'));
    }
}
