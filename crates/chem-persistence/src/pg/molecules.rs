use std::collections::VecDeque;

use chem_core::{MoleculeStore, StructureStream};
use chem_domain::{MoleculeRecord, MoleculeUpdate, NewMolecule, StoreError};
use diesel::prelude::*;
use log::{debug, info};

use super::{with_retry, ConnectionProvider};
use crate::error::PersistenceError;
use crate::schema::molecules;

/// Filas por página al recorrer todas las estructuras.
pub const STREAM_PAGE_SIZE: i64 = 1000;

type Page = Vec<(i32, String)>;

/// Fila de la tabla `molecules`.
#[derive(Queryable, Debug, Clone, PartialEq, Eq)]
pub struct MoleculeRow {
    pub id: i32,
    pub smiles_string: String,
    pub name: Option<String>,
}

impl From<MoleculeRow> for MoleculeRecord {
    fn from(row: MoleculeRow) -> Self {
        MoleculeRecord { id: row.id, smiles: row.smiles_string, name: row.name }
    }
}

#[derive(Insertable, Debug)]
#[diesel(table_name = molecules)]
struct NewMoleculeRow<'a> {
    smiles_string: &'a str,
    name: Option<&'a str>,
}

/// Campos `None` no se tocan; `name: Some(None)` escribe NULL.
#[derive(AsChangeset, Debug)]
#[diesel(table_name = molecules)]
struct MoleculeChangeset<'a> {
    smiles_string: Option<&'a str>,
    name: Option<Option<&'a str>>,
}

impl<'a> From<&'a MoleculeUpdate> for MoleculeChangeset<'a> {
    fn from(u: &'a MoleculeUpdate) -> Self {
        MoleculeChangeset { smiles_string: u.smiles.as_deref(), name: u.name.as_ref().map(|n| n.as_deref()) }
    }
}

/// Implementación Postgres de `MoleculeStore`.
pub struct PgMoleculeStore<P: ConnectionProvider> {
    provider: P,
    page_size: i64,
}

impl<P: ConnectionProvider> PgMoleculeStore<P> {
    pub fn new(provider: P) -> Self {
        Self { provider, page_size: STREAM_PAGE_SIZE }
    }

    /// Tamaño de página de `stream_structures` (mínimo 1).
    pub fn with_page_size(mut self, page_size: i64) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    fn fetch_page(&self, after_id: i32) -> Result<Page, PersistenceError> {
        with_retry(|| {
            let mut conn = self.provider.connection()?;
            let page = molecules::table.select((molecules::id, molecules::smiles_string))
                                       .filter(molecules::id.gt(after_id))
                                       .order(molecules::id.asc())
                                       .limit(self.page_size)
                                       .load::<(i32, String)>(&mut conn)?;
            Ok(page)
        })
    }
}

impl<P: ConnectionProvider> MoleculeStore for PgMoleculeStore<P> {
    fn add(&self, new: &NewMolecule) -> Result<MoleculeRecord, StoreError> {
        info!("Insertando molécula {}", new.smiles);
        // Las escrituras no se reintentan: sólo la obtención de la conexión.
        let mut conn = with_retry(|| self.provider.connection())?;
        let row = diesel::insert_into(molecules::table).values(NewMoleculeRow { smiles_string: &new.smiles,
                                                                               name: new.name.as_deref() })
                                                       .get_result::<MoleculeRow>(&mut conn)
                                                       .map_err(PersistenceError::from)?;
        Ok(row.into())
    }

    fn get_by_id(&self, id: i32) -> Result<Option<MoleculeRecord>, StoreError> {
        debug!("Leyendo molécula {id}");
        let row = with_retry(|| {
            let mut conn = self.provider.connection()?;
            Ok(molecules::table.find(id).first::<MoleculeRow>(&mut conn).optional()?)
        })?;
        Ok(row.map(Into::into))
    }

    fn get_by_structure(&self, smiles: &str) -> Result<Option<MoleculeRecord>, StoreError> {
        debug!("Leyendo molécula por SMILES {smiles}");
        let row = with_retry(|| {
            let mut conn = self.provider.connection()?;
            Ok(molecules::table.filter(molecules::smiles_string.eq(smiles))
                               .first::<MoleculeRow>(&mut conn)
                               .optional()?)
        })?;
        Ok(row.map(Into::into))
    }

    fn list(&self, skip: i64, limit: i64) -> Result<Vec<MoleculeRecord>, StoreError> {
        debug!("Listando moléculas skip={skip} limit={limit}");
        let rows = with_retry(|| {
            let mut conn = self.provider.connection()?;
            Ok(molecules::table.order(molecules::id.asc())
                               .offset(skip)
                               .limit(limit)
                               .load::<MoleculeRow>(&mut conn)?)
        })?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    fn stream_structures(&self) -> Result<StructureStream<'_>, StoreError> {
        info!("Recorriendo todas las estructuras para una búsqueda");
        Ok(Box::new(PagedStructures::new(move |after_id| self.fetch_page(after_id), self.page_size)))
    }

    fn update(&self, id: i32, changes: &MoleculeUpdate) -> Result<Option<MoleculeRecord>, StoreError> {
        if changes.is_empty() {
            return self.get_by_id(id);
        }
        info!("Actualizando molécula {id}");
        let mut conn = with_retry(|| self.provider.connection())?;
        let row = diesel::update(molecules::table.find(id)).set(&MoleculeChangeset::from(changes))
                                                          .get_result::<MoleculeRow>(&mut conn)
                                                          .optional()
                                                          .map_err(PersistenceError::from)?;
        Ok(row.map(Into::into))
    }

    fn delete(&self, id: i32) -> Result<bool, StoreError> {
        info!("Eliminando molécula {id}");
        let mut conn = with_retry(|| self.provider.connection())?;
        let deleted = diesel::delete(molecules::table.find(id)).execute(&mut conn)
                                                              .map_err(PersistenceError::from)?;
        Ok(deleted > 0)
    }
}

/// Recorrido por páginas de `page_size` filas (keyset sobre `id`).
///
/// Cada página usa una conexión distinta del pool, así que no se retiene
/// ninguna entre elementos. Una página incompleta marca el final; si la
/// última página viene completa se pide una más, que llega vacía. Tras el
/// primer error el iterador termina.
struct PagedStructures<F> {
    fetch: F,
    page_size: i64,
    last_id: i32,
    buffer: VecDeque<String>,
    exhausted: bool,
}

impl<F> PagedStructures<F> where F: FnMut(i32) -> Result<Page, PersistenceError>
{
    fn new(fetch: F, page_size: i64) -> Self {
        Self { fetch, page_size, last_id: 0, buffer: VecDeque::new(), exhausted: false }
    }
}

impl<F> Iterator for PagedStructures<F> where F: FnMut(i32) -> Result<Page, PersistenceError>
{
    type Item = Result<String, StoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(smiles) = self.buffer.pop_front() {
            return Some(Ok(smiles));
        }
        if self.exhausted {
            return None;
        }
        match (self.fetch)(self.last_id) {
            Ok(page) => {
                self.exhausted = (page.len() as i64) < self.page_size;
                if let Some((id, _)) = page.last() {
                    self.last_id = *id;
                }
                self.buffer.extend(page.into_iter().map(|(_, smiles)| smiles));
                self.buffer.pop_front().map(Ok)
            }
            Err(e) => {
                self.exhausted = true;
                Some(Err(e.into()))
            }
        }
    }
}
