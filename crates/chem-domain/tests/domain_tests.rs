use chem_domain::{JobState, MoleculeRecord, MoleculeUpdate, SearchArgs, SearchOutcome, StructureValidator};
use serde_json::json;

#[test]
fn test_update_payload_from_request_body() {
    // Un PUT que sólo trae el nombre no toca la estructura
    let upd: MoleculeUpdate = serde_json::from_value(json!({"name": "Aspirin"})).unwrap();
    let mut rec = MoleculeRecord { id: 4, smiles: "CC(=O)Oc1ccccc1C(=O)O".into(), name: None };
    upd.apply_to(&mut rec);
    assert_eq!(rec.smiles, "CC(=O)Oc1ccccc1C(=O)O");
    assert_eq!(rec.name.as_deref(), Some("Aspirin"));
}

#[test]
fn test_null_smiles_is_treated_as_absent() {
    let upd: MoleculeUpdate = serde_json::from_value(json!({"smiles_string": null})).unwrap();
    assert!(upd.is_empty());
}

#[test]
fn test_validator_accepts_scenario_structures() {
    let v = StructureValidator::default();
    for s in ["CCO", "c1ccccc1", "CC(=O)O", "CC(=O)Oc1ccccc1C(=O)O", "C[C@H](O)C(=O)O"] {
        assert!(v.validate(s), "{s} debería ser válido");
    }
    assert!(!v.validate("invalid-smiles-string"));
    assert_eq!(v.memoized(), 5);
}

#[test]
fn test_search_args_wire_format() {
    let args: SearchArgs = serde_json::from_value(json!({"substructure_smiles": "c1ccccc1"})).unwrap();
    assert_eq!(args.substructure_smiles, "c1ccccc1");
}

#[test]
fn test_failed_state_without_detail_falls_back_to_status() {
    let mut state = JobState::failed("x");
    state.error = None;
    assert_eq!(state.outcome(), Some(SearchOutcome::Error("FAILURE".into())));
}
