use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Registro persistido de una molécula.
///
/// `id` lo asigna el almacén y no cambia; `smiles` es único en la tabla.
/// En JSON el campo de estructura se llama `smiles_string`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoleculeRecord {
    pub id: i32,
    #[serde(rename = "smiles_string")]
    pub smiles: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl fmt::Display for MoleculeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "<#{} {} ({})>", self.id, self.smiles, name),
            None => write!(f, "<#{} {}>", self.id, self.smiles),
        }
    }
}

/// Datos de alta de una molécula.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMolecule {
    #[serde(rename = "smiles_string")]
    pub smiles: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl NewMolecule {
    pub fn new(smiles: impl Into<String>, name: Option<String>) -> Self {
        Self { smiles: smiles.into(), name }
    }
}

/// Actualización parcial.
///
/// Un campo ausente no se toca. Para `name` se distingue "ausente" (`None`)
/// de "explícitamente nulo" (`Some(None)`, borra el nombre). Un
/// `smiles_string: null` se trata como ausente: la columna es obligatoria.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoleculeUpdate {
    #[serde(default, rename = "smiles_string", skip_serializing_if = "Option::is_none")]
    pub smiles: Option<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub name: Option<Option<String>>,
}

/// Envuelve en `Some` todo valor presente (incluido `null`).
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where D: Deserializer<'de>,
          T: Deserialize<'de>
{
    T::deserialize(deserializer).map(Some)
}

impl MoleculeUpdate {
    pub fn smiles(smiles: impl Into<String>) -> Self {
        Self { smiles: Some(smiles.into()), name: None }
    }

    pub fn name(name: Option<String>) -> Self {
        Self { smiles: None, name: Some(name) }
    }

    /// `true` si no hay ningún campo presente (la actualización es un no-op).
    pub fn is_empty(&self) -> bool {
        self.smiles.is_none() && self.name.is_none()
    }

    /// Aplica los campos presentes sobre un registro.
    pub fn apply_to(&self, record: &mut MoleculeRecord) {
        if let Some(smiles) = &self.smiles {
            record.smiles = smiles.clone();
        }
        if let Some(name) = &self.name {
            record.name = name.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_json_uses_smiles_string() {
        let r = MoleculeRecord { id: 1, smiles: "CCO".into(), name: Some("Ethanol".into()) };
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json, serde_json::json!({"id": 1, "smiles_string": "CCO", "name": "Ethanol"}));
        let back: MoleculeRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, r);
    }

    #[test]
    fn update_distinguishes_absent_from_null() {
        let absent: MoleculeUpdate = serde_json::from_str(r#"{"smiles_string": "CC"}"#).unwrap();
        assert_eq!(absent.name, None);
        let null: MoleculeUpdate = serde_json::from_str(r#"{"name": null}"#).unwrap();
        assert_eq!(null.name, Some(None));
        let set: MoleculeUpdate = serde_json::from_str(r#"{"name": "x"}"#).unwrap();
        assert_eq!(set.name, Some(Some("x".into())));
        let empty: MoleculeUpdate = serde_json::from_str("{}").unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn apply_only_touches_present_fields() {
        let mut r = MoleculeRecord { id: 3, smiles: "CCO".into(), name: Some("Ethanol".into()) };
        MoleculeUpdate::name(Some("Etanol".into())).apply_to(&mut r);
        assert_eq!(r.smiles, "CCO");
        assert_eq!(r.name.as_deref(), Some("Etanol"));
        MoleculeUpdate::name(None).apply_to(&mut r);
        assert_eq!(r.name, None);
        MoleculeUpdate::smiles("CC").apply_to(&mut r);
        assert_eq!(r.smiles, "CC");
        assert_eq!(r.id, 3);
    }
}
