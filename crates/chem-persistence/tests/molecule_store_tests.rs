
use chem_core::MoleculeStore;
use chem_domain::{MoleculeUpdate, NewMolecule, StoreError};
use chem_persistence::{PgMoleculeStore, PoolProvider};
use test_support::{unique, with_pool};

fn store() -> Option<PgMoleculeStore<PoolProvider>> {
    with_pool(|pool| PgMoleculeStore::new(PoolProvider { pool: pool.clone() }))
}

#[test]
fn add_get_update_delete_round_trip() {
    let Some(store) = store() else { eprintln!("DATABASE_URL no definido: omitiendo test"); return; };
    let smiles = unique("CCO");
    let created = store.add(&NewMolecule::new(&smiles, Some("Ethanol".into()))).expect("add");
    assert_eq!(store.get_by_id(created.id).unwrap(), Some(created.clone()));
    assert_eq!(store.get_by_structure(&smiles).unwrap(), Some(created.clone()));

    let renamed = store.update(created.id, &MoleculeUpdate::name(Some("Etanol".into()))).unwrap().unwrap();
    assert_eq!(renamed.smiles, smiles);
    assert_eq!(renamed.name.as_deref(), Some("Etanol"));

    let cleared = store.update(created.id, &MoleculeUpdate::name(None)).unwrap().unwrap();
    assert_eq!(cleared.name, None);

    let unchanged = store.update(created.id, &MoleculeUpdate::default()).unwrap().unwrap();
    assert_eq!(unchanged, cleared);

    assert!(store.delete(created.id).unwrap());
    assert!(!store.delete(created.id).unwrap());
    assert_eq!(store.get_by_id(created.id).unwrap(), None);
    assert_eq!(store.update(created.id, &MoleculeUpdate::name(None)).unwrap(), None);
}

#[test]
fn duplicate_structure_is_conflict() {
    let Some(store) = store() else { eprintln!("DATABASE_URL no definido: omitiendo test"); return; };
    let smiles = unique("c1ccccc1");
    let created = store.add(&NewMolecule::new(&smiles, None)).expect("add");
    let err = store.add(&NewMolecule::new(&smiles, None)).unwrap_err();
    assert!(matches!(err, StoreError::Conflict(_)), "{err:?}");
    store.delete(created.id).unwrap();
}

#[test]
fn list_and_stream_follow_id_order() {
    let Some(store) = store() else { eprintln!("DATABASE_URL no definido: omitiendo test"); return; };
    let inserted: Vec<_> = (0..3).map(|i| store.add(&NewMolecule::new(unique(&format!("C{i}")), None)).unwrap())
                                 .collect();
    let listed = store.list(0, 1000).unwrap();
    let ids: Vec<i32> = listed.iter().map(|r| r.id).collect();
    let mut sorted = ids.clone();
    sorted.sort();
    assert_eq!(ids, sorted);

    let streamed: Vec<String> = store.stream_structures().unwrap().map(Result::unwrap).collect();
    let positions: Vec<usize> = inserted.iter()
                                        .map(|r| streamed.iter().position(|s| *s == r.smiles).expect("en el stream"))
                                        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));

    for r in inserted {
        store.delete(r.id).unwrap();
    }
}

#[test]
fn small_pages_stream_every_row_once() {
    let Some(store) = store() else { eprintln!("DATABASE_URL no definido: omitiendo test"); return; };
    let store = store.with_page_size(2);
    let inserted: Vec<_> = (0..5).map(|i| store.add(&NewMolecule::new(unique(&format!("CO{i}")), None)).unwrap())
                                 .collect();
    let streamed: Vec<String> = store.stream_structures().unwrap().map(Result::unwrap).collect();
    for r in &inserted {
        assert_eq!(streamed.iter().filter(|s| **s == r.smiles).count(), 1, "{} una sola vez", r.smiles);
    }
    for r in inserted {
        store.delete(r.id).unwrap();
    }
}
