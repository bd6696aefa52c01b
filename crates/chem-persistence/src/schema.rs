//! Esquema Diesel (escrito a mano). Reemplazable con `diesel print-schema`.

diesel::table! {
    molecules (id) {
        id -> Integer,
        smiles_string -> Text,
        name -> Nullable<Varchar>,
    }
}

diesel::table! {
    search_jobs (id) {
        id -> Uuid,
        task_name -> Text,
        payload -> Jsonb,
        status -> Text,
        result -> Nullable<Jsonb>,
        error -> Nullable<Text>,
        created_at -> Timestamptz,
        started_at -> Nullable<Timestamptz>,
        finished_at -> Nullable<Timestamptz>,
    }
}

diesel::allow_tables_to_appear_in_same_query!(
    molecules,
    search_jobs,
);
