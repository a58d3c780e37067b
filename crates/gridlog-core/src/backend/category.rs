use super::record::Record;
use super::{read, write, Appender};
use crate::level::Level;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Name of the root category.
pub const ROOT_NAME: &str = "root";

/// Level the root category starts with.
const ROOT_LEVEL: Level = Level::Debug;

/// One node of the hierarchical category namespace.
///
/// Categories only link upwards; the hierarchy owns them and callers hold
/// shared references.
#[derive(Debug)]
pub struct Category {
    name: String,
    parent: Option<Arc<Category>>,
    level: RwLock<Option<Level>>,
    appenders: RwLock<Vec<Appender>>,
}

impl Category {
    fn new_root() -> Self {
        Self {
            name: ROOT_NAME.to_string(),
            parent: None,
            level: RwLock::new(Some(ROOT_LEVEL)),
            appenders: RwLock::new(Vec::new()),
        }
    }

    fn new_child(name: &str, parent: Arc<Category>) -> Self {
        Self {
            name: name.to_string(),
            parent: Some(parent),
            level: RwLock::new(None),
            appenders: RwLock::new(Vec::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<&Arc<Category>> {
        self.parent.as_ref()
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// The topmost ancestor (the category itself if it has no parent).
    pub fn root_of(category: &Arc<Category>) -> Arc<Category> {
        let mut node = category.clone();
        while let Some(parent) = node.parent.clone() {
            node = parent;
        }
        node
    }

    /// The category itself followed by each ancestor up to the root.
    pub fn lineage(&self) -> impl Iterator<Item = &Category> {
        std::iter::successors(Some(self), |c| c.parent.as_deref())
    }

    /// Explicitly configured level, if any.
    pub fn level(&self) -> Option<Level> {
        *read(&self.level)
    }

    pub fn set_level(&self, level: Level) {
        *write(&self.level) = Some(level);
    }

    /// First configured level found walking towards the root.
    pub fn effective_level(&self) -> Level {
        self.lineage().find_map(Category::level).unwrap_or(ROOT_LEVEL)
    }

    pub fn is_enabled(&self, level: Level) -> bool {
        level >= self.effective_level()
    }

    pub fn add_appender(&self, appender: Appender) {
        let mut appenders = write(&self.appenders);
        if !appenders.iter().any(|a| a.same_as(&appender)) {
            appenders.push(appender);
        }
    }

    pub fn remove_appender(&self, appender: &Appender) -> bool {
        let mut appenders = write(&self.appenders);
        let before = appenders.len();
        appenders.retain(|a| !a.same_as(appender));
        appenders.len() != before
    }

    /// Snapshot of the appenders attached directly to this category.
    pub fn appenders(&self) -> Vec<Appender> {
        read(&self.appenders).clone()
    }

    pub fn has_appenders(&self) -> bool {
        !read(&self.appenders).is_empty()
    }

    /// Level-checked logging.
    pub fn log(&self, level: Level, message: &str, cause: Option<String>) {
        if self.is_enabled(level) {
            self.emit(&Record::new(level, self.name.as_str(), message).with_cause(cause));
        }
    }

    /// Offer a record to every appender on the way to the root, skipping the
    /// category level check. Write failures are reported through `tracing`
    /// and never reach the caller.
    pub fn emit(&self, record: &Record) {
        for category in self.lineage() {
            for appender in category.appenders() {
                if !appender.accepts(record.level) {
                    continue;
                }
                if let Err(err) = appender.append(record) {
                    tracing::warn!(
                        component = module_path!(),
                        category = %category.name,
                        appender = appender.name(),
                        error = %err,
                        "appender write failed"
                    );
                }
            }
        }
    }
}

/// Owner of all categories of one backend instance.
#[derive(Debug)]
pub struct Hierarchy {
    root: Arc<Category>,
    categories: RwLock<HashMap<String, Arc<Category>>>,
}

impl Hierarchy {
    pub fn new() -> Self {
        Self {
            root: Arc::new(Category::new_root()),
            categories: RwLock::new(HashMap::new()),
        }
    }

    pub fn root(&self) -> Arc<Category> {
        self.root.clone()
    }

    /// Look up or create a category by dotted name. Missing ancestors are
    /// created on the way; an empty name or `root` yields the root.
    pub fn category(&self, name: &str) -> Arc<Category> {
        let name = name.trim();
        if name.is_empty() || name == ROOT_NAME {
            return self.root();
        }
        if let Some(existing) = read(&self.categories).get(name) {
            return existing.clone();
        }

        let mut categories = write(&self.categories);
        let mut parent = self.root();
        for (idx, _) in name.match_indices('.').chain(std::iter::once((name.len(), ""))) {
            let prefix = &name[..idx];
            if prefix.is_empty() || prefix.ends_with('.') {
                continue;
            }
            let node = categories
                .entry(prefix.to_string())
                .or_insert_with(|| Arc::new(Category::new_child(prefix, parent.clone())))
                .clone();
            parent = node;
        }
        parent
    }

    /// Whether the root category already has an appender.
    pub fn is_configured(&self) -> bool {
        self.root.has_appenders()
    }

    /// Names of all non-root categories created so far.
    pub fn category_names(&self) -> Vec<String> {
        read(&self.categories).keys().cloned().collect()
    }
}

impl Default for Hierarchy {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{ConsoleAppender, ConsoleTarget, SharedBuffer};

    fn buffer_appender(name: &str) -> (Appender, SharedBuffer) {
        let buf = SharedBuffer::new();
        let app = Appender::console(ConsoleAppender::new(name, ConsoleTarget::Buffer(buf.clone())));
        (app, buf)
    }

    #[test]
    fn test_category_creates_ancestors() {
        let h = Hierarchy::new();
        let leaf = h.category("grid.spi.discovery");

        let names: Vec<&str> = leaf.lineage().map(Category::name).collect();
        assert_eq!(names, vec!["grid.spi.discovery", "grid.spi", "grid", ROOT_NAME]);
        assert!(Arc::ptr_eq(&leaf, &h.category("grid.spi.discovery")));
    }

    #[test]
    fn test_empty_name_is_root() {
        let h = Hierarchy::new();
        assert!(h.category("").is_root());
        assert!(h.category("root").is_root());
    }

    #[test]
    fn test_effective_level_inherits() {
        let h = Hierarchy::new();
        let leaf = h.category("a.b");
        assert_eq!(leaf.effective_level(), Level::Debug);

        h.category("a").set_level(Level::Warn);
        assert_eq!(leaf.effective_level(), Level::Warn);
        assert!(!leaf.is_enabled(Level::Info));
        assert!(leaf.is_enabled(Level::Error));
    }

    #[test]
    fn test_emit_reaches_ancestor_appenders() {
        let h = Hierarchy::new();
        let (app, buf) = buffer_appender("c");
        h.root().add_appender(app);

        h.category("a.b").log(Level::Info, "hello", None);
        h.category("a.b").log(Level::Trace, "dropped", None);

        let records = buf.records();
        assert_eq!(records.len(), 1);
        assert!(records[0].ends_with("[b] hello"));
    }

    #[test]
    fn test_add_appender_is_idempotent() {
        let h = Hierarchy::new();
        let (app, _buf) = buffer_appender("c");
        h.root().add_appender(app.clone());
        h.root().add_appender(app.clone());
        assert_eq!(h.root().appenders().len(), 1);

        assert!(h.root().remove_appender(&app));
        assert!(!h.root().remove_appender(&app));
        assert!(!h.is_configured());
    }
}
