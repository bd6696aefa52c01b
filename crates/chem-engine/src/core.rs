use std::fmt;

use rdkit::{substruct_match, ROMol, SmilesParserParams, SubstructMatchParameters};

use crate::EngineError;

/// Molécula parseada por RDKit junto con el SMILES de entrada.
pub struct Molecule {
    smiles: String,
    mol: ROMol,
}

impl Molecule {
    /// Parsea y sanitiza (aromaticidad, kekulización, valencias) igual que
    /// `Chem.MolFromSmiles`. Una cadena vacía no es una molécula.
    pub fn from_smiles(smiles: &str) -> Result<Self, EngineError> {
        if smiles.trim().is_empty() {
            return Err(EngineError::parse(smiles, "cadena vacía"));
        }
        // `from_smiles_with_params` también convierte en error el puntero
        // nulo que RDKit devuelve para SMILES sintácticamente inválidos.
        let mol = ROMol::from_smiles_with_params(smiles, &SmilesParserParams::default())
            .map_err(|e| EngineError::parse(smiles, e.to_string()))?;
        Ok(Self { smiles: smiles.to_string(), mol })
    }

    /// SMILES tal como llegó.
    pub fn smiles(&self) -> &str {
        &self.smiles
    }

    /// SMILES canónico de RDKit.
    pub fn canonical_smiles(&self) -> String {
        self.mol.as_smiles()
    }

    /// `true` si `query` aparece como subgrafo de esta molécula.
    pub fn has_substructure(&self, query: &Molecule) -> bool {
        let params = SubstructMatchParameters::default();
        !substruct_match(&self.mol, &query.mol, &params).is_empty()
    }
}

impl fmt::Debug for Molecule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Molecule").field("smiles", &self.smiles).finish()
    }
}
