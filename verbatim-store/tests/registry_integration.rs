//! Registry, environment and catalog collaborators.
//!
//! Verifies:
//! - Language fallback resolution and store sharing between tags
//! - Runtime directory lifetime follows the last open handle
//! - Legacy migration into a registry root, then reopening the moved data
//! - Catalog import with progress and cancellation
//! - Pre-translation options

use std::path::Path;

use tempfile::tempdir;
use verbatim_store::env::RUNTIME_DIR;
use verbatim_store::{
    import_catalog, pretranslate, Catalog, CatalogEntry, PretranslateOptions, Progress, Registry,
    FuzzyParams, TmConfig, TmError, Updater,
};

fn registry(root: &Path) -> Registry {
    Registry::new(TmConfig::for_testing(root))
}

// ─── Language Resolution ─────────────────────────────────────────────────────

#[test]
fn test_region_tag_uses_base_language_store() {
    let root = tempdir().unwrap();
    std::fs::create_dir_all(root.path().join("de")).unwrap();
    let reg = registry(root.path());

    assert!(reg.is_supported("de_AT"));
    let tm = reg.open("de_AT").unwrap();
    assert_eq!(tm.db_path(), root.path().join("de"));
    assert!(!root.path().join("de_AT").exists());
}

#[test]
fn test_variants_share_data() {
    let root = tempdir().unwrap();
    std::fs::create_dir_all(root.path().join("pt_BR")).unwrap();
    let reg = registry(root.path());

    let pt_br = reg.open("pt_BR").unwrap();
    pt_br.store("Open file", "Abrir arquivo").unwrap();

    let pt = reg.open("pt").unwrap();
    assert!(pt.shares_store_with(&pt_br));
    assert_eq!(pt.lookup("Open file").unwrap().translations, ["Abrir arquivo"]);
}

#[test]
fn test_languages_listed() {
    let root = tempdir().unwrap();
    let reg = registry(root.path());
    let _fr = reg.open("fr").unwrap();
    let _cs = reg.open("cs").unwrap();
    assert_eq!(reg.languages().unwrap(), ["cs", "fr"]);
}

// ─── Environment Lifecycle ───────────────────────────────────────────────────

#[test]
fn test_runtime_dir_follows_last_handle() {
    let root = tempdir().unwrap();
    let runtime = root.path().join(RUNTIME_DIR);
    let reg = registry(root.path());
    assert!(!reg.environment_active());

    let fr = reg.open("fr").unwrap();
    let de = reg.open("de").unwrap();
    let fr2 = fr.clone();
    assert_eq!(fr.runtime_dir().parent(), Some(runtime.as_path()));
    assert_eq!(fr.runtime_dir(), de.runtime_dir());
    assert!(fr.runtime_dir().is_dir());
    assert!(reg.environment_active());

    drop(fr);
    drop(de);
    assert!(runtime.is_dir());
    assert_eq!(reg.open_count(), 1);

    fr2.release().unwrap();
    assert!(!runtime.exists());
    assert!(!reg.environment_active());
    assert_eq!(reg.open_count(), 0);

    // A new open brings it back.
    let again = reg.open("fr").unwrap();
    assert!(runtime.is_dir());
    drop(again);
    assert!(!runtime.exists());
}

// ─── Migration ───────────────────────────────────────────────────────────────

#[test]
fn test_migrate_then_open_moved_store() {
    let base = tempdir().unwrap();
    let old_root = base.path().join("old");
    let new_root = base.path().join("new");

    {
        let old = registry(&old_root);
        let tm = old.open("cs").unwrap();
        tm.store("Hello world", "Ahoj světe").unwrap();
        tm.release().unwrap();
    }

    let reg = registry(&new_root);
    let report = reg.migrate_legacy(&old_root, None).unwrap();
    assert_eq!(report.moved, ["cs"]);
    assert!(report.removed_old_root);
    assert!(!old_root.exists());

    let tm = reg.open("cs").unwrap();
    assert_eq!(tm.lookup("Hello world").unwrap().translations, ["Ahoj světe"]);
    assert!(matches!(reg.migrate_legacy(&old_root, None), Err(TmError::InUse(1))));
}

// ─── Import ──────────────────────────────────────────────────────────────────

fn sample_catalog() -> Vec<CatalogEntry> {
    vec![
        CatalogEntry::new("Open", "Ouvrir"),
        CatalogEntry::untranslated("Close"),
        CatalogEntry::new("Save", "Enregistrer").fuzzy(),
        CatalogEntry::new("Quit", "Quitter"),
    ]
}

#[test]
fn test_import_skips_untranslated_and_fuzzy() {
    let root = tempdir().unwrap();
    let reg = registry(root.path());
    let tm = reg.open("fr").unwrap();

    let stats = import_catalog(&tm, &sample_catalog()).unwrap();
    assert_eq!((stats.stored, stats.skipped), (2, 2));
    assert!(tm.lookup("Open").unwrap().is_exact());
    assert!(tm.lookup_exact("Close").unwrap().is_none());
    assert!(tm.lookup_exact("Save").unwrap().is_none());
}

#[derive(Default)]
struct CountingProgress {
    total: usize,
    done: usize,
    cancel_after: Option<usize>,
    messages: usize,
}

impl Progress for CountingProgress {
    fn set_total(&mut self, total: usize) {
        self.total = total;
    }

    fn message(&mut self, _message: &str) {
        self.messages += 1;
    }

    fn advance(&mut self) {
        self.done += 1;
    }

    fn cancelled(&self) -> bool {
        self.cancel_after.is_some_and(|n| self.done >= n)
    }
}

#[test]
fn test_updater_reports_progress() {
    let root = tempdir().unwrap();
    let reg = registry(root.path());
    let tm = reg.open("fr").unwrap();

    let catalogs = vec![
        Catalog::new("app.po", sample_catalog()).with_language("fr"),
        Catalog::new("other.po", vec![CatalogEntry::new("Print", "Imprimer")]),
        Catalog::new("german.po", vec![CatalogEntry::new("Print", "Drucken")]).with_language("de"),
    ];

    let mut updater = Updater::with_progress(&tm, CountingProgress::default());
    let stats = updater.update(&catalogs).unwrap();
    assert_eq!((stats.stored, stats.skipped, stats.cancelled), (3, 2, false));
    assert_eq!(updater.progress().total, 3);
    assert_eq!(updater.progress().done, 3);
    assert_eq!(updater.progress().messages, 3);
    assert_eq!(tm.lookup("Print").unwrap().translations, ["Imprimer"]);
}

#[test]
fn test_updater_cancellation() {
    let root = tempdir().unwrap();
    let reg = registry(root.path());
    let tm = reg.open("fr").unwrap();

    let catalogs = vec![
        Catalog::new("first.po", vec![CatalogEntry::new("One", "Un")]),
        Catalog::new("second.po", vec![CatalogEntry::new("Two", "Deux")]),
    ];
    let progress = CountingProgress {
        cancel_after: Some(1),
        ..CountingProgress::default()
    };

    let stats = Updater::with_progress(&tm, progress).update(&catalogs).unwrap();
    assert!(stats.cancelled);
    assert_eq!(stats.stored, 1);
    assert!(tm.lookup_exact("Two").unwrap().is_none());
}

// ─── Pre-translation ─────────────────────────────────────────────────────────

fn pretranslation_memory(root: &Path) -> (Registry, verbatim_store::TranslationMemory) {
    let reg = registry(root);
    let tm = reg.open("fr").unwrap();
    tm.store("Open the file", "Ouvrir le fichier").unwrap();
    tm.store("Close window", "Fermer la fenêtre").unwrap();
    (reg, tm)
}

fn pretranslation_items() -> Vec<CatalogEntry> {
    vec![
        CatalogEntry::untranslated("Open the file"),
        CatalogEntry::untranslated("open file"),
        CatalogEntry::new("Close window", "Fermer").fuzzy(),
        CatalogEntry::new("Close window", "Fermer"),
        CatalogEntry::untranslated("Open the file").with_plural("Open the files"),
        CatalogEntry::untranslated("Nothing similar here"),
    ]
}

#[test]
fn test_pretranslate_defaults() {
    let root = tempdir().unwrap();
    let (_reg, tm) = pretranslation_memory(root.path());
    let mut items = pretranslation_items();

    let stats = pretranslate(&tm, &mut items, &PretranslateOptions::default()).unwrap();
    assert_eq!((stats.exact, stats.fuzzy), (2, 1));

    assert_eq!(items[0].translation, "Ouvrir le fichier");
    assert!(items[0].fuzzy && items[0].pretranslated);
    assert_eq!(items[1].translation, "Ouvrir le fichier");
    assert!(items[1].fuzzy);
    assert_eq!(items[2].translation, "Fermer la fenêtre");
    // Finished translations are left alone.
    assert_eq!(items[3].translation, "Fermer");
    assert!(!items[3].pretranslated);
    // Plurals are skipped.
    assert!(items[4].translation.is_empty());
    assert!(items[5].translation.is_empty());
}

#[test]
fn test_pretranslate_only_exact_not_fuzzy() {
    let root = tempdir().unwrap();
    let (_reg, tm) = pretranslation_memory(root.path());
    let mut items = pretranslation_items();

    let options = PretranslateOptions {
        only_exact: true,
        exact_not_fuzzy: true,
        ..PretranslateOptions::default()
    };
    let stats = pretranslate(&tm, &mut items, &options).unwrap();
    assert_eq!((stats.exact, stats.fuzzy), (2, 0));
    assert!(!items[0].fuzzy);
    assert!(items[1].translation.is_empty());
}

#[test]
fn test_pretranslate_min_score() {
    let root = tempdir().unwrap();
    let (_reg, tm) = pretranslation_memory(root.path());

    // "File" reaches "Open the file" at tier (0, 1): score 77.
    let mut items = vec![CatalogEntry::untranslated("File")];
    let stats = pretranslate(&tm, &mut items, &PretranslateOptions::good_quality()).unwrap();
    assert_eq!(stats.total(), 0);

    let stats = pretranslate(&tm, &mut items, &PretranslateOptions::default()).unwrap();
    assert_eq!(stats.fuzzy, 1);
    assert_eq!(items[0].translation, "Ouvrir le fichier");
}

#[test]
fn test_pretranslate_full_score_fuzzy_stays_fuzzy() {
    let root = tempdir().unwrap();
    let (_reg, mut tm) = pretranslation_memory(root.path());
    tm.set_params(FuzzyParams::new(3, 1));

    // "window close" hits "Close window" at tier (0, 0), which scores 100 here.
    let mut items = vec![CatalogEntry::untranslated("window close")];
    let options = PretranslateOptions {
        exact_not_fuzzy: true,
        ..PretranslateOptions::default()
    };
    let stats = pretranslate(&tm, &mut items, &options).unwrap();
    assert_eq!((stats.exact, stats.fuzzy), (0, 1));
    assert_eq!(items[0].translation, "Fermer la fenêtre");
    assert!(items[0].fuzzy);
}
