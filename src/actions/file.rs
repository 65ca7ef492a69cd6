use crate::app::AppState;
use crate::store::TreeStore;
use anyhow::Result;

pub fn save(app: &mut AppState) -> Result<()> {
    let Some(store) = app.store.as_ref() else {
        app.set_message("No file to save to - start with `pagetree FILE`");
        return Ok(());
    };

    match store.save(&app.tree) {
        Ok(()) => {
            let message = format!("Saved to {}", store.path().display());
            app.mark_saved();
            app.set_message(message);
            Ok(())
        }
        Err(e) => {
            app.set_message(format!("Failed to save: {}", e));
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::model::{Node, PageItem};
    use crate::store::{DocumentFormat, JsonFileStore};
    use crate::tree::OrphanPolicy;
    use tempfile::TempDir;

    #[test]
    fn test_save_clears_dirty_flag() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("site.json");
        let mut app = AppState::new(AppConfig::default());
        app.store = Some(JsonFileStore::new(&path, DocumentFormat::Nested, OrphanPolicy::Drop));
        app.load_tree(vec![Node::new("home", PageItem::page("Home"))]);
        app.is_dirty = true;

        save(&mut app).unwrap();

        assert!(!app.is_dirty);
        assert!(path.exists());
    }

    #[test]
    fn test_save_without_store() {
        let mut app = AppState::new(AppConfig::default());
        app.is_dirty = true;

        save(&mut app).unwrap();

        assert!(app.is_dirty);
        assert!(app.message.is_some());
    }

    #[test]
    fn test_save_failure_is_reported() {
        let dir = TempDir::new().unwrap();
        let mut app = AppState::new(AppConfig::default());
        app.store = Some(JsonFileStore::new(
            dir.path().join("missing-dir").join("site.json"),
            DocumentFormat::Nested,
            OrphanPolicy::Drop,
        ));

        assert!(save(&mut app).is_err());
        assert!(app.message.as_deref().unwrap().starts_with("Failed to save"));
    }
}
