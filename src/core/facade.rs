//! 日志门面（Timber 风格）
//!
//! 应用代码只和 [`LogFacade`] 打交道。没有种下任何 tree 时所有调用都是空操作；
//! userdebug 构建会种下 [`FileLoggingSink`](crate::core::sink::FileLoggingSink)。
//! 门面以 `Arc` 显式传递，不依赖隐藏的全局状态。

use crate::core::sink::Priority;
use std::error::Error;
use std::sync::{Arc, RwLock};

/// 接收每一条分级日志的组件
pub trait LogTree: Send + Sync {
    fn log(
        &self,
        priority: i32,
        tag: Option<&str>,
        message: &str,
        error: Option<&(dyn Error + 'static)>,
    );
}

#[derive(Default)]
pub struct LogFacade {
    trees: RwLock<Vec<Arc<dyn LogTree>>>,
}

impl LogFacade {
    pub fn new() -> Self {
        Self::default()
    }

    /// 种下一个 tree，此后的日志都会分发给它
    pub fn plant(&self, tree: Arc<dyn LogTree>) {
        if let Ok(mut trees) = self.trees.write() {
            trees.push(tree);
        }
    }

    pub fn uproot_all(&self) {
        if let Ok(mut trees) = self.trees.write() {
            trees.clear();
        }
    }

    pub fn tree_count(&self) -> usize {
        self.trees.read().map(|t| t.len()).unwrap_or(0)
    }

    pub fn log(
        &self,
        priority: i32,
        tag: Option<&str>,
        message: &str,
        error: Option<&(dyn Error + 'static)>,
    ) {
        let Ok(trees) = self.trees.read() else {
            return;
        };
        for tree in trees.iter() {
            tree.log(priority, tag, message, error);
        }
    }

    pub fn verbose(&self, message: &str, error: Option<&(dyn Error + 'static)>) {
        self.log(Priority::Verbose.as_raw(), None, message, error);
    }

    pub fn debug(&self, message: &str, error: Option<&(dyn Error + 'static)>) {
        self.log(Priority::Debug.as_raw(), None, message, error);
    }

    pub fn info(&self, message: &str, error: Option<&(dyn Error + 'static)>) {
        self.log(Priority::Info.as_raw(), None, message, error);
    }

    pub fn warn(&self, message: &str, error: Option<&(dyn Error + 'static)>) {
        self.log(Priority::Warn.as_raw(), None, message, error);
    }

    pub fn error(&self, message: &str, error: Option<&(dyn Error + 'static)>) {
        self.log(Priority::Error.as_raw(), None, message, error);
    }

    /// 带 tag 的视图，`facade.tag("Net").info("...", None)`
    pub fn tag<'a>(&'a self, tag: &'a str) -> Tagged<'a> {
        Tagged { facade: self, tag }
    }
}

/// 固定 tag 的门面视图
pub struct Tagged<'a> {
    facade: &'a LogFacade,
    tag: &'a str,
}

impl Tagged<'_> {
    pub fn verbose(&self, message: &str, error: Option<&(dyn Error + 'static)>) {
        self.at(Priority::Verbose, message, error);
    }

    pub fn debug(&self, message: &str, error: Option<&(dyn Error + 'static)>) {
        self.at(Priority::Debug, message, error);
    }

    pub fn info(&self, message: &str, error: Option<&(dyn Error + 'static)>) {
        self.at(Priority::Info, message, error);
    }

    pub fn warn(&self, message: &str, error: Option<&(dyn Error + 'static)>) {
        self.at(Priority::Warn, message, error);
    }

    pub fn error(&self, message: &str, error: Option<&(dyn Error + 'static)>) {
        self.at(Priority::Error, message, error);
    }

    fn at(&self, priority: Priority, message: &str, error: Option<&(dyn Error + 'static)>) {
        self.facade
            .log(priority.as_raw(), Some(self.tag), message, error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct CollectingTree {
        seen: Mutex<Vec<(i32, Option<String>, String)>>,
    }

    impl LogTree for CollectingTree {
        fn log(
            &self,
            priority: i32,
            tag: Option<&str>,
            message: &str,
            _error: Option<&(dyn Error + 'static)>,
        ) {
            self.seen
                .lock()
                .unwrap()
                .push((priority, tag.map(str::to_string), message.to_string()));
        }
    }

    #[test]
    fn test_no_trees_is_noop() {
        let facade = LogFacade::new();
        facade.info("nobody listens", None);
        facade.error("still nobody", None);
        assert_eq!(facade.tree_count(), 0);
    }

    #[test]
    fn test_every_tree_receives_calls() {
        let facade = LogFacade::new();
        let first = Arc::new(CollectingTree::default());
        let second = Arc::new(CollectingTree::default());
        facade.plant(first.clone());
        facade.plant(second.clone());

        facade.info("Info", None);
        facade.verbose("Verbose", None);

        for tree in [&first, &second] {
            let seen = tree.seen.lock().unwrap();
            assert_eq!(
                *seen,
                vec![(4, None, "Info".to_string()), (2, None, "Verbose".to_string())]
            );
        }
    }

    #[test]
    fn test_tagged_view_passes_tag() {
        let facade = LogFacade::new();
        let tree = Arc::new(CollectingTree::default());
        facade.plant(tree.clone());

        facade.tag("Net").warn("timeout", None);

        let seen = tree.seen.lock().unwrap();
        assert_eq!(*seen, vec![(5, Some("Net".to_string()), "timeout".to_string())]);
    }

    #[test]
    fn test_uproot_all_stops_delivery() {
        let facade = LogFacade::new();
        let tree = Arc::new(CollectingTree::default());
        facade.plant(tree.clone());
        facade.uproot_all();

        facade.debug("gone", None);

        assert!(tree.seen.lock().unwrap().is_empty());
        assert_eq!(facade.tree_count(), 0);
    }
}
