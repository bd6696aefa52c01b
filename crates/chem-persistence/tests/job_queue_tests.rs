
use chem_core::{JobConsumer, JobQueue};
use chem_domain::JobState;
use chem_persistence::{PgJobQueue, PoolProvider};
use serde_json::json;
use test_support::{unique, with_pool};

fn queue() -> Option<PgJobQueue<PoolProvider>> {
    with_pool(|pool| PgJobQueue::new(PoolProvider { pool: pool.clone() }))
}

#[test]
fn job_lifecycle_success() {
    let Some(queue) = queue() else { eprintln!("DATABASE_URL no definido: omitiendo test"); return; };
    // Nombre de tarea propio para no competir con workers reales.
    let task = unique("test.search");
    let ticket = queue.submit(&task, json!({"substructure_smiles": "c1ccccc1"})).unwrap();
    assert_eq!(ticket.status, "PENDING");
    assert_eq!(queue.status(&ticket.job_id).unwrap(), JobState::pending());

    let job = queue.claim_next(&task).unwrap().expect("trabajo pendiente");
    assert_eq!(job.job_id, ticket.job_id);
    assert_eq!(job.args, json!({"substructure_smiles": "c1ccccc1"}));
    assert_eq!(queue.status(&ticket.job_id).unwrap().status, "STARTED");
    assert!(queue.claim_next(&task).unwrap().is_none());

    queue.complete(&job.job_id, &Ok(vec!["c1ccccc1".into()])).unwrap();
    assert_eq!(queue.status(&ticket.job_id).unwrap(), JobState::succeeded(vec!["c1ccccc1".into()]));
}

#[test]
fn job_lifecycle_failure() {
    let Some(queue) = queue() else { eprintln!("DATABASE_URL no definido: omitiendo test"); return; };
    let task = unique("test.search");
    let ticket = queue.submit(&task, json!({})).unwrap();
    let job = queue.claim_next(&task).unwrap().unwrap();
    queue.complete(&job.job_id, &Err("Invalid substructure: x".into())).unwrap();
    assert_eq!(queue.status(&ticket.job_id).unwrap(), JobState::failed("Invalid substructure: x"));
}

#[test]
fn unknown_ids_are_pending() {
    let Some(queue) = queue() else { eprintln!("DATABASE_URL no definido: omitiendo test"); return; };
    assert_eq!(queue.status(&uuid::Uuid::new_v4().to_string()).unwrap(), JobState::pending());
    assert_eq!(queue.status("not-a-uuid").unwrap(), JobState::pending());
    assert!(queue.complete(&uuid::Uuid::new_v4().to_string(), &Ok(vec![])).is_err());
}
