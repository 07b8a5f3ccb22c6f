/// Issues unique label prefixes for one compilation. Every scope takes the
/// next counter value, so labels from different scopes never collide.
#[derive(Debug, Default)]
pub struct LabelGenerator {
    counter: u32,
}

impl LabelGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a fresh scope for `category`: labels look like
    /// `-category-N-suffix`.
    pub fn scope(&mut self, category: &str) -> LabelScope {
        self.counter += 1;
        LabelScope {
            prefix: format!("-{}-{}-", category, self.counter),
        }
    }

    /// Number of scopes issued so far.
    pub fn issued(&self) -> u32 {
        self.counter
    }
}

/// A set of related labels sharing one unique prefix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelScope {
    prefix: String,
}

impl LabelScope {
    pub fn label(&self, suffix: &str) -> String {
        format!("{}{}", self.prefix, suffix)
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_labels_share_prefix() {
        let mut labels = LabelGenerator::new();
        let compare = labels.scope("compare");
        assert_eq!(compare.label("true"), "-compare-1-true");
        assert_eq!(compare.label("join"), "-compare-1-join");
    }

    #[test]
    fn test_scopes_are_unique_across_categories() {
        let mut labels = LabelGenerator::new();
        let a = labels.scope("boolean");
        let b = labels.scope("compare");
        let c = labels.scope("boolean");
        assert_eq!(a.label("join"), "-boolean-1-join");
        assert_eq!(b.label("join"), "-compare-2-join");
        assert_eq!(c.label("join"), "-boolean-3-join");
        assert_eq!(labels.issued(), 3);
    }

    #[test]
    fn test_generators_are_independent() {
        let mut first = LabelGenerator::new();
        let mut second = LabelGenerator::new();
        first.scope("compare");
        assert_eq!(second.scope("compare").prefix(), "-compare-1-");
    }
}
