//! Mutable taxonomy construction.

use super::tree::{NodeData, Taxonomy};
use super::{TaxonomyError, MAX_DEPTH, MAX_INDEX, PATH_SEPARATOR};

#[derive(Debug, Clone)]
struct BuildNode {
    name: String,
    parent: Option<usize>,
    min_level: u8,
    depth: usize,
    children: Vec<usize>,
}

/// Accumulates nodes and produces an immutable [`Taxonomy`].
///
/// Children are kept in insertion order while building; [`build`](Self::build)
/// sorts every sibling list by name once and assigns the final indices.
///
/// # Example
///
/// ```
/// use geofeature::taxonomy::TaxonomyBuilder;
///
/// let mut builder = TaxonomyBuilder::new();
/// builder.add_path("natural.coastline")?.add_path("natural.water")?;
/// let taxonomy = builder.build()?;
///
/// assert!(taxonomy.find_path("natural.water").is_some());
/// # Ok::<(), geofeature::taxonomy::TaxonomyError>(())
/// ```
#[derive(Debug, Clone)]
pub struct TaxonomyBuilder {
    nodes: Vec<BuildNode>,
}

/// Handle to a node inside a [`TaxonomyBuilder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildId(usize);

impl TaxonomyBuilder {
    pub fn new() -> Self {
        Self {
            nodes: vec![BuildNode {
                name: String::new(),
                parent: None,
                min_level: 0,
                depth: 0,
                children: Vec::new(),
            }],
        }
    }

    /// The root node.
    pub fn root(&self) -> BuildId {
        BuildId(0)
    }

    /// Add a new child under `parent`.
    ///
    /// Fails if a sibling with the same name exists, if the name is invalid,
    /// or if the child would be deeper than a type code can describe.
    pub fn add_child(
        &mut self,
        parent: BuildId,
        name: &str,
        min_level: u8,
    ) -> Result<BuildId, TaxonomyError> {
        validate_name(name)?;
        if self.find_child(parent, name).is_some() {
            return Err(TaxonomyError::DuplicateName {
                parent: self.path_of(parent),
                name: name.to_string(),
            });
        }
        self.insert_child(parent, name, min_level)
    }

    /// Add every missing node along a dotted path.
    ///
    /// Existing nodes are reused, so paths sharing a prefix share nodes.
    pub fn add_path(&mut self, path: &str) -> Result<&mut Self, TaxonomyError> {
        self.add_path_with_level(path, 0)
    }

    /// Like [`add_path`](Self::add_path), setting the minimum visible level
    /// of the last node.
    pub fn add_path_with_level(
        &mut self,
        path: &str,
        min_level: u8,
    ) -> Result<&mut Self, TaxonomyError> {
        let names: Vec<&str> = path.split(PATH_SEPARATOR).collect();
        let mut current = self.root();
        for (i, name) in names.iter().enumerate() {
            let is_last = i + 1 == names.len();
            current = match self.find_child(current, name) {
                Some(existing) => existing,
                None => {
                    validate_name(name)?;
                    self.insert_child(current, name, 0)?
                }
            };
            if is_last {
                self.nodes[current.0].min_level = min_level;
            }
        }
        Ok(self)
    }

    /// Number of nodes added so far, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when nothing but the root exists.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Sort siblings, assign depth-first indices and freeze the tree.
    pub fn build(self) -> Result<Taxonomy, TaxonomyError> {
        let max = MAX_INDEX as usize + 1;
        if self.nodes.len() > max {
            return Err(TaxonomyError::TooManyNodes {
                count: self.nodes.len(),
                max,
            });
        }

        let mut out: Vec<NodeData> = Vec::with_capacity(self.nodes.len());
        // (build id, parent's final index)
        let mut stack: Vec<(usize, Option<u32>)> = vec![(0, None)];

        while let Some((id, parent)) = stack.pop() {
            let node = &self.nodes[id];
            let index = out.len() as u32;
            out.push(NodeData {
                name: node.name.clone(),
                parent,
                children: Vec::with_capacity(node.children.len()),
                min_level: node.min_level,
                depth: node.depth as u8,
            });
            if let Some(parent) = parent {
                out[parent as usize].children.push(index);
            }

            let mut children = node.children.clone();
            children.sort_by(|&a, &b| self.nodes[a].name.cmp(&self.nodes[b].name));
            // Reverse so the smallest name is popped (and numbered) first.
            stack.extend(children.into_iter().rev().map(|child| (child, Some(index))));
        }

        Ok(Taxonomy::from_nodes(out))
    }

    fn find_child(&self, parent: BuildId, name: &str) -> Option<BuildId> {
        self.nodes[parent.0]
            .children
            .iter()
            .copied()
            .find(|&child| self.nodes[child].name == name)
            .map(BuildId)
    }

    fn insert_child(
        &mut self,
        parent: BuildId,
        name: &str,
        min_level: u8,
    ) -> Result<BuildId, TaxonomyError> {
        let depth = self.nodes[parent.0].depth + 1;
        if depth > MAX_DEPTH {
            let parent_path = self.path_of(parent);
            return Err(TaxonomyError::TooDeep {
                path: format!("{parent_path}{PATH_SEPARATOR}{name}"),
                max: MAX_DEPTH,
            });
        }

        let id = self.nodes.len();
        self.nodes.push(BuildNode {
            name: name.to_string(),
            parent: Some(parent.0),
            min_level,
            depth,
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        Ok(BuildId(id))
    }

    fn path_of(&self, id: BuildId) -> String {
        let mut names = Vec::new();
        let mut current = id.0;
        while let Some(parent) = self.nodes[current].parent {
            names.push(self.nodes[current].name.as_str());
            current = parent;
        }
        names.reverse();
        names.join(&PATH_SEPARATOR.to_string())
    }
}

impl Default for TaxonomyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_name(name: &str) -> Result<(), TaxonomyError> {
    let reserved = |c: char| c == PATH_SEPARATOR || c == '@' || c == '#' || c.is_whitespace();
    if name.is_empty() || name.chars().any(reserved) {
        return Err(TaxonomyError::InvalidName(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_builder_has_root_only() {
        let builder = TaxonomyBuilder::new();
        assert!(builder.is_empty());
        let taxonomy = builder.build().unwrap();
        assert_eq!(taxonomy.len(), 1);
        assert_eq!(taxonomy.root().child_count(), 0);
        assert!(!taxonomy.is_empty());
    }

    #[test]
    fn test_add_path_shares_prefix() {
        let mut builder = TaxonomyBuilder::new();
        builder
            .add_path("natural.coastline")
            .unwrap()
            .add_path("natural.water")
            .unwrap();
        assert_eq!(builder.len(), 4);
    }

    #[test]
    fn test_add_child_rejects_duplicates() {
        let mut builder = TaxonomyBuilder::new();
        let root = builder.root();
        let natural = builder.add_child(root, "natural", 0).unwrap();
        builder.add_child(natural, "water", 0).unwrap();
        let err = builder.add_child(natural, "water", 0).unwrap_err();
        assert!(matches!(
            err,
            TaxonomyError::DuplicateName { ref parent, ref name } if parent == "natural" && name == "water"
        ));
    }

    #[test]
    fn test_invalid_names() {
        let mut builder = TaxonomyBuilder::new();
        let root = builder.root();
        for bad in ["", "a b", "a@b", "x#y", "a.b"] {
            assert!(matches!(
                builder.add_child(root, bad, 0),
                Err(TaxonomyError::InvalidName(_))
            ));
        }
        assert!(matches!(
            builder.add_path("natural..water"),
            Err(TaxonomyError::InvalidName(_))
        ));
    }

    #[test]
    fn test_duplicate_reports_full_parent_path() {
        let mut builder = TaxonomyBuilder::new();
        builder.add_path("highway.primary.link").unwrap();
        let primary = builder
            .find_child(builder.root(), "highway")
            .and_then(|highway| builder.find_child(highway, "primary"))
            .unwrap();
        let err = builder.add_child(primary, "link", 0).unwrap_err();
        assert!(matches!(
            err,
            TaxonomyError::DuplicateName { ref parent, .. } if parent == "highway.primary"
        ));
        assert_eq!(builder.path_of(builder.root()), "");
    }

    #[test]
    fn test_too_deep() {
        let mut builder = TaxonomyBuilder::new();
        builder.add_path("a.b.c.d.e").unwrap();
        let err = builder.add_path("a.b.c.d.e.f").unwrap_err();
        assert!(matches!(err, TaxonomyError::TooDeep { ref path, max } if path == "a.b.c.d.e.f" && max == MAX_DEPTH));
    }

    #[test]
    fn test_too_many_nodes() {
        let mut builder = TaxonomyBuilder::new();
        for i in 0..=MAX_INDEX {
            builder.add_path(&format!("n{i}")).unwrap();
        }
        let err = builder.build().unwrap_err();
        assert!(matches!(err, TaxonomyError::TooManyNodes { count, .. } if count == MAX_INDEX as usize + 2));
    }

    #[test]
    fn test_max_node_count_builds() {
        let mut builder = TaxonomyBuilder::new();
        for i in 0..MAX_INDEX {
            builder.add_path(&format!("n{i}")).unwrap();
        }
        let taxonomy = builder.build().unwrap();
        assert_eq!(taxonomy.len(), MAX_INDEX as usize + 1);
    }

    #[test]
    fn test_min_level_is_kept() {
        let mut builder = TaxonomyBuilder::new();
        builder.add_path_with_level("highway.motorway", 4).unwrap();
        let taxonomy = builder.build().unwrap();
        assert_eq!(taxonomy.find_path("highway.motorway").unwrap().min_level(), 4);
        assert_eq!(taxonomy.find_path("highway").unwrap().min_level(), 0);
    }
}
