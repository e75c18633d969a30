use std::collections::HashSet;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use lorekeeper::data::datastore::DataStore;
use lorekeeper::data::mutator::{split_champion_list, MutatorDraft};
use lorekeeper::data::tag::TagData;

fn unique_data_dir(name: &str) -> PathBuf {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after unix epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("lorekeeper-mutators-{name}-{stamp}"))
}

fn draft(name: &str, description: &str) -> MutatorDraft {
    MutatorDraft {
        name: name.to_string(),
        description: description.to_string(),
        ..MutatorDraft::default()
    }
}

#[test]
fn adding_a_mutator_persists_across_reopen() {
    let dir = unique_data_dir("persist");
    let mut store = DataStore::open(&dir);
    let added = store
        .add_mutator(draft("Storm", "Lightning everywhere"))
        .expect("mutator should be added");
    assert!(!added.id.is_empty());

    let reopened = DataStore::open(&dir);
    assert_eq!(reopened.mutators().len(), 1);
    assert_eq!(reopened.mutators()[0].name, "Storm");
    assert_eq!(reopened.mutators()[0].id, added.id);
}

#[test]
fn empty_name_or_description_is_a_silent_no_op() {
    let mut store = DataStore::open(unique_data_dir("noop"));
    assert!(store.add_mutator(draft("", "described")).is_none());
    assert!(store.add_mutator(draft("  ", "described")).is_none());
    assert!(store.add_mutator(draft("Named", "")).is_none());
    assert!(store.mutators().is_empty());
}

#[test]
fn ids_stay_distinct_in_a_tight_loop() {
    let mut store = DataStore::open(unique_data_dir("ids"));
    let mut ids = HashSet::new();
    for index in 0..50 {
        let added = store
            .add_mutator(draft(&format!("Mutator {index}"), "filler"))
            .expect("mutator should be added");
        ids.insert(added.id);
    }
    assert_eq!(ids.len(), 50);
}

#[test]
fn tag_inference_unions_stored_tag_champions() {
    let mut store = DataStore::open(unique_data_dir("inference"));
    store.update_tag(
        "Weather",
        TagData {
            good_champions: "Ahri,Zed".to_string(),
            bad_champions: "Teemo".to_string(),
        },
    );

    let added = store
        .add_mutator(MutatorDraft {
            tag: "Weather".to_string(),
            ..draft("Storm", "Lightning everywhere")
        })
        .expect("mutator should be added");

    let good: HashSet<String> = split_champion_list(&added.good_champions).into_iter().collect();
    assert!(good.contains("Ahri") && good.contains("Zed"), "got {good:?}");
    assert_eq!(added.bad_champions, "Teemo");
}

#[test]
fn tag_inference_keeps_explicit_entries_first() {
    let mut store = DataStore::open(unique_data_dir("inference-order"));
    store.update_tag(
        "Weather",
        TagData {
            good_champions: "A,B".to_string(),
            bad_champions: String::new(),
        },
    );

    let added = store
        .add_mutator(MutatorDraft {
            good_champions: "C;A".to_string(),
            tag: "Weather".to_string(),
            ..draft("Storm", "Lightning everywhere")
        })
        .expect("mutator should be added");
    assert_eq!(added.good_champions, "C, A, B");
}

#[test]
fn multi_tag_drafts_inherit_from_every_tag() {
    let mut store = DataStore::open(unique_data_dir("multi-tag"));
    store.update_tag(
        "Weather",
        TagData {
            good_champions: "Ahri".to_string(),
            bad_champions: String::new(),
        },
    );
    store.update_tag(
        "Burst",
        TagData {
            good_champions: "Zed".to_string(),
            bad_champions: String::new(),
        },
    );

    let added = store
        .add_mutator(MutatorDraft {
            tag: "Weather, Burst".to_string(),
            ..draft("Tempest", "Both at once")
        })
        .expect("mutator should be added");
    assert_eq!(added.good_champions, "Ahri, Zed");
}

#[test]
fn edit_replaces_the_matching_record_only() {
    let mut store = DataStore::open(unique_data_dir("edit"));
    let first = store
        .add_mutator(draft("Storm", "Lightning everywhere"))
        .expect("mutator should be added");
    store
        .add_mutator(draft("Frost", "Everything freezes"))
        .expect("mutator should be added");

    let mut updated = first.clone();
    updated.strategy = "Bring boots".to_string();
    assert!(store.edit_mutator(updated));
    assert_eq!(store.mutators()[0].strategy, "Bring boots");
    assert_eq!(store.mutators()[1].strategy, "");

    let mut unknown = first.clone();
    unknown.id = "no-such-id".to_string();
    unknown.strategy = "ignored".to_string();
    assert!(!store.edit_mutator(unknown));
    assert_eq!(store.mutators().len(), 2);
}

#[test]
fn delete_removes_by_id_and_ignores_unknown_ids() {
    let mut store = DataStore::open(unique_data_dir("delete"));
    let added = store
        .add_mutator(draft("Storm", "Lightning everywhere"))
        .expect("mutator should be added");

    assert!(!store.delete_mutator("no-such-id"));
    assert_eq!(store.mutators().len(), 1);

    assert!(store.delete_mutator(&added.id));
    assert!(store.mutators().is_empty());
}

#[test]
fn updating_a_tag_twice_is_idempotent() {
    let dir = unique_data_dir("tag-idempotent");
    let mut store = DataStore::open(&dir);
    let data = TagData {
        good_champions: "Ahri".to_string(),
        bad_champions: "Teemo".to_string(),
    };
    assert!(store.update_tag("Weather", data.clone()));
    let after_first = store.tags().clone();
    assert!(store.update_tag("Weather", data));
    assert_eq!(store.tags(), &after_first);
    assert_eq!(store.tags().len(), 1);
}

#[test]
fn tag_update_with_empty_name_is_rejected() {
    let mut store = DataStore::open(unique_data_dir("tag-empty"));
    assert!(!store.update_tag("   ", TagData::default()));
    assert!(store.tags().is_empty());
}

#[test]
fn mutations_keep_the_export_projection_in_sync() {
    let mut store = DataStore::open(unique_data_dir("projection"));
    store
        .add_mutator(draft("Storm", "Lightning everywhere"))
        .expect("mutator should be added");
    store.update_tag(
        "Weather",
        TagData {
            good_champions: "Ahri".to_string(),
            bad_champions: String::new(),
        },
    );

    let sheets = store.sheets();
    let mutator_rows = sheets.get("Mutators").expect("Mutators projection");
    assert_eq!(mutator_rows.len(), 1);
    assert_eq!(
        mutator_rows[0].get("Mutator_name").and_then(|v| v.as_str()),
        Some("Storm")
    );
    let tag_rows = sheets.get("Tags").expect("Tags projection");
    assert_eq!(
        tag_rows[0].get("Tag_name").and_then(|v| v.as_str()),
        Some("Weather")
    );
}

#[test]
fn change_notifications_fire_per_registry() {
    use std::cell::RefCell;
    use std::rc::Rc;

    use lorekeeper::data::datastore::Change;

    let mut store = DataStore::open(unique_data_dir("notify"));
    let seen: Rc<RefCell<Vec<Change>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    store.subscribe(move |change| sink.borrow_mut().push(change));

    store
        .add_mutator(draft("Storm", "Lightning everywhere"))
        .expect("mutator should be added");
    store.update_tag("Weather", TagData::default());
    store.clear_all();

    assert_eq!(
        seen.borrow().as_slice(),
        &[Change::Mutators, Change::Tags, Change::All]
    );
}

#[test]
fn clear_all_wipes_every_collection() {
    let dir = unique_data_dir("clear");
    let mut store = DataStore::open(&dir);
    store
        .add_mutator(draft("Storm", "Lightning everywhere"))
        .expect("mutator should be added");
    store.update_tag("Weather", TagData::default());
    store.commit_champion(1, "Ahri").expect("commit should apply");

    store.clear_all();
    assert!(store.mutators().is_empty());
    assert!(store.tags().is_empty());
    assert!(store.commits().is_empty());
    assert!(store.sheets().is_empty());

    let reopened = DataStore::open(&dir);
    assert!(reopened.mutators().is_empty());
    assert!(reopened.commits().is_empty());
}
