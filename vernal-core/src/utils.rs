//! Utility functions for the container
//!
//! This module provides the module-path matching used by the component
//! scanner and the dependency-graph helpers used during bean creation
//! and validation.

/// Module path utilities for component scanning
pub mod paths {
    /// Checks whether `module_path` lies within the scanned `base_path`.
    ///
    /// A module lies within a base path when it is the base path itself or
    /// a submodule of it. Matching is segment-aware, so scanning
    /// `app::service` does not accidentally pick up `app::services`.
    ///
    /// # Examples
    ///
    /// ```
    /// use vernal_core::utils::paths::is_within;
    ///
    /// assert!(is_within("app::service", "app::service"));
    /// assert!(is_within("app::service::orders", "app::service"));
    /// assert!(!is_within("app::services", "app::service"));
    /// assert!(!is_within("other::service", "app::service"));
    /// ```
    pub fn is_within(module_path: &str, base_path: &str) -> bool {
        if module_path == base_path {
            return true;
        }

        match module_path.strip_prefix(base_path) {
            Some(rest) => rest.starts_with("::"),
            None => false,
        }
    }
}

/// Dependency resolution utilities
pub mod dependency {
    use std::collections::{HashMap, HashSet};

    use parking_lot::RwLock;

    /// Tracks beans currently being created to detect circular dependencies.
    #[derive(Debug, Default)]
    pub struct CreationTracker {
        creating: RwLock<HashSet<String>>,
    }

    impl CreationTracker {
        /// Creates a new empty creation tracker.
        pub fn new() -> Self {
            Self {
                creating: RwLock::new(HashSet::new()),
            }
        }

        /// Checks if a bean is currently being created.
        pub fn is_creating(&self, name: &str) -> bool {
            self.creating.read().contains(name)
        }

        /// Marks a bean as being created.
        pub fn start_creating(&self, name: &str) {
            self.creating.write().insert(name.to_string());
        }

        /// Marks a bean as finished being created.
        pub fn finish_creating(&self, name: &str) {
            self.creating.write().remove(name);
        }

        /// Gets a snapshot of all beans currently being created.
        ///
        /// Used to build the chain shown in circular-dependency errors.
        pub fn current_creating(&self) -> Vec<String> {
            self.creating.read().iter().cloned().collect()
        }
    }

    /// Dependency graph validation error
    #[derive(Debug)]
    pub enum DependencyValidationError {
        /// Circular dependency detected
        CircularDependency { cycle: Vec<String> },
        /// A declared dependency is not registered
        MissingDependency { bean: String, missing: String },
    }

    impl std::fmt::Display for DependencyValidationError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Self::CircularDependency { cycle } => {
                    write!(f, "circular dependency detected: {}", cycle.join(" -> "))
                }
                Self::MissingDependency { bean, missing } => {
                    write!(
                        f,
                        "bean '{}' depends on '{}' which is not registered",
                        bean, missing
                    )
                }
            }
        }
    }

    /// Validates a dependency graph for missing beans and cycles.
    ///
    /// `dependencies` maps each bean name to its declared dependencies.
    /// Returns the first issue found.
    pub fn validate_dependency_graph(
        dependencies: &HashMap<String, Vec<String>>,
    ) -> Result<(), DependencyValidationError> {
        for (bean_name, deps) in dependencies {
            for dep in deps {
                if !dependencies.contains_key(dep) {
                    return Err(DependencyValidationError::MissingDependency {
                        bean: bean_name.clone(),
                        missing: dep.clone(),
                    });
                }
            }
        }

        let mut visited = HashSet::new();
        let mut rec_stack = Vec::new();

        for bean_name in dependencies.keys() {
            if !visited.contains(bean_name) {
                if let Some(cycle) =
                    detect_cycle_dfs(bean_name, dependencies, &mut visited, &mut rec_stack)
                {
                    return Err(DependencyValidationError::CircularDependency { cycle });
                }
            }
        }

        Ok(())
    }

    /// DFS-based cycle detection, returns the cycle if one exists.
    fn detect_cycle_dfs(
        node: &str,
        graph: &HashMap<String, Vec<String>>,
        visited: &mut HashSet<String>,
        rec_stack: &mut Vec<String>,
    ) -> Option<Vec<String>> {
        visited.insert(node.to_string());
        rec_stack.push(node.to_string());

        if let Some(deps) = graph.get(node) {
            for dep in deps {
                if !visited.contains(dep) {
                    if let Some(cycle) = detect_cycle_dfs(dep, graph, visited, rec_stack) {
                        return Some(cycle);
                    }
                } else if rec_stack.contains(dep) {
                    let start_idx = rec_stack.iter().position(|x| x == dep)?;
                    let mut cycle = rec_stack[start_idx..].to_vec();
                    cycle.push(dep.to_string());
                    return Some(cycle);
                }
            }
        }

        rec_stack.pop();
        None
    }
}

#[cfg(test)]
mod tests {
    mod paths_tests {
        use super::super::paths::*;

        #[test]
        fn test_is_within_exact_match() {
            assert!(is_within("app::service", "app::service"));
        }

        #[test]
        fn test_is_within_submodule() {
            assert!(is_within("app::service::orders", "app::service"));
            assert!(is_within("app::service::orders::repo", "app::service"));
        }

        #[test]
        fn test_is_within_rejects_sibling_prefix() {
            // 'app::services' shares a textual prefix but is another module
            assert!(!is_within("app::services", "app::service"));
            assert!(!is_within("app::service_ext", "app::service"));
        }

        #[test]
        fn test_is_within_rejects_unrelated() {
            assert!(!is_within("other::service", "app::service"));
            assert!(!is_within("app", "app::service"));
        }
    }

    mod dependency_tests {
        use super::super::dependency::*;
        use std::collections::HashMap;

        #[test]
        fn test_creation_tracker() {
            let tracker = CreationTracker::new();

            assert!(!tracker.is_creating("serviceA"));

            tracker.start_creating("serviceA");
            assert!(tracker.is_creating("serviceA"));

            tracker.finish_creating("serviceA");
            assert!(!tracker.is_creating("serviceA"));
        }

        #[test]
        fn test_current_creating() {
            let tracker = CreationTracker::new();

            tracker.start_creating("serviceA");
            tracker.start_creating("serviceB");

            let creating = tracker.current_creating();
            assert_eq!(creating.len(), 2);
            assert!(creating.contains(&"serviceA".to_string()));
            assert!(creating.contains(&"serviceB".to_string()));
        }

        #[test]
        fn test_validate_missing_dependency() {
            let mut deps = HashMap::new();
            deps.insert("serviceA".to_string(), vec!["serviceB".to_string()]);
            // serviceB is not registered

            let result = validate_dependency_graph(&deps);

            match result {
                Err(DependencyValidationError::MissingDependency { bean, missing }) => {
                    assert_eq!(bean, "serviceA");
                    assert_eq!(missing, "serviceB");
                }
                other => panic!("Expected MissingDependency error, got {:?}", other),
            }
        }

        #[test]
        fn test_validate_circular_dependency() {
            let mut deps = HashMap::new();
            deps.insert("serviceA".to_string(), vec!["serviceB".to_string()]);
            deps.insert("serviceB".to_string(), vec!["serviceC".to_string()]);
            deps.insert("serviceC".to_string(), vec!["serviceA".to_string()]);

            let result = validate_dependency_graph(&deps);

            match result {
                Err(DependencyValidationError::CircularDependency { cycle }) => {
                    assert!(cycle.len() >= 3);
                    let cycle_str = cycle.join(" -> ");
                    assert!(cycle_str.contains("serviceA"));
                    assert!(cycle_str.contains("serviceB"));
                    assert!(cycle_str.contains("serviceC"));
                }
                other => panic!("Expected CircularDependency error, got {:?}", other),
            }
        }

        #[test]
        fn test_validate_valid_graph() {
            let mut deps = HashMap::new();
            deps.insert("config".to_string(), vec![]);
            deps.insert("database".to_string(), vec!["config".to_string()]);
            deps.insert(
                "userService".to_string(),
                vec!["database".to_string(), "config".to_string()],
            );

            assert!(validate_dependency_graph(&deps).is_ok());
        }

        #[test]
        fn test_validate_self_dependency() {
            let mut deps = HashMap::new();
            deps.insert("serviceA".to_string(), vec!["serviceA".to_string()]);

            let result = validate_dependency_graph(&deps);

            match result {
                Err(DependencyValidationError::CircularDependency { cycle }) => {
                    assert_eq!(cycle.len(), 2); // serviceA -> serviceA
                }
                other => panic!("Expected CircularDependency error, got {:?}", other),
            }
        }
    }
}
