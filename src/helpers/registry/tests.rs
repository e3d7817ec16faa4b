use super::*;

#[test]
fn priority_order_is_fixed() {
    let order: Vec<_> = priority_order().iter().map(|s| s.name).collect();
    assert_eq!(
        order,
        vec!["yay", "paru", "pacaur", "trizen", "pikaur", "aurman"]
    );
}

#[test]
fn fallback_is_makepkg_and_not_in_priority_order() {
    assert_eq!(fallback().name, FALLBACK_HELPER);
    assert_eq!(fallback().kind, HelperKind::BuildTool);
    assert!(priority_order().iter().all(|s| s.name != FALLBACK_HELPER));
}

#[test]
fn lookup_finds_every_registered_name() {
    for name in names() {
        assert_eq!(lookup(name).unwrap().name, name);
    }
}

#[test]
fn lookup_unknown_fails() {
    assert!(matches!(lookup("yaourt"), Err(AurError::UnknownHelper(n)) if n == "yaourt"));
}

#[test]
fn names_are_unique() {
    let mut all = names();
    all.sort();
    all.dedup();
    assert_eq!(all.len(), names().len());
}

#[test]
fn only_makepkg_offers_pgp_and_arch_overrides() {
    for spec in priority_order() {
        assert!(spec.skip_pgp_flag.is_none(), "{}", spec.name);
        assert!(spec.ignore_arch_flag.is_none(), "{}", spec.name);
        assert!(spec.aur_only_flag.is_some(), "{}", spec.name);
    }
    assert!(fallback().skip_pgp_flag.is_some());
    assert!(fallback().aur_only_flag.is_none());
}

#[test]
fn local_builds_limited_to_makepkg_and_pikaur() {
    let local: Vec<_> = names()
        .into_iter()
        .filter(|n| lookup(n).unwrap().supports_local_build())
        .collect();
    assert_eq!(local, vec!["pikaur", "makepkg"]);
}

#[test]
fn markers_are_lowercase() {
    for name in names() {
        for marker in lookup(name).unwrap().unchanged_markers {
            assert_eq!(*marker, marker.to_lowercase());
        }
    }
}
