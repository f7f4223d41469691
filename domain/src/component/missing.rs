//! Missing-name computation for the dependency resolver

use std::collections::BTreeSet;

use super::entities::ComponentDescriptor;

/// Names required by `present` components that nobody provides
///
/// A name is provided when it is one of the present components, one of the
/// `declared` (project-owned) components, or part of the `system` set.
pub fn missing_names<'a, I>(
    present: &[ComponentDescriptor],
    declared: I,
    system: &BTreeSet<String>,
) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a ComponentDescriptor>,
{
    let declared: Vec<&ComponentDescriptor> = declared.into_iter().collect();
    let provided: BTreeSet<&str> = present
        .iter()
        .chain(declared.iter().copied())
        .map(|d| d.name.as_str())
        .chain(system.iter().map(String::as_str))
        .collect();

    present
        .iter()
        .chain(declared.iter().copied())
        .flat_map(|d| d.requires.iter())
        .filter(|name| !provided.contains(name.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn system(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_missing_excludes_present_declared_and_system() {
        let present = vec![
            ComponentDescriptor::new("a").requiring(["b", "std.base"]),
            ComponentDescriptor::new("b").requiring(["c", "app"]),
        ];
        let declared = vec![ComponentDescriptor::new("app").requiring(["a", "d"])];

        let missing = missing_names(&present, &declared, &system(&["std.base"]));
        assert_eq!(missing, system(&["c", "d"]));
    }

    #[test]
    fn test_nothing_missing_when_closed() {
        let present = vec![ComponentDescriptor::new("a")];
        assert!(missing_names(&present, &Vec::<ComponentDescriptor>::new(), &BTreeSet::new()).is_empty());
    }
}
