//! SQLite persistence for an index generation.
//!
//! One database file holds the chunk texts, the parallel metadata, the
//! vectors, and a single info row describing the build. Chunk ids are the
//! corpus positions; every table keys on them.

use crate::error::{IndexError, IndexResult};
use crate::generation::GenerationInfo;
use docint_core::{Chunk, ChunkMeta, Modality};
use rusqlite::{params, Connection};
use std::path::Path;
use tracing::info;

/// Database file name inside a generation directory.
pub const GENERATION_DB_FILE: &str = "generation.sqlite";

/// Current schema version.
const SCHEMA_VERSION: i32 = 1;

pub(crate) fn open(path: &Path) -> IndexResult<Connection> {
    let conn = Connection::open(path)?;
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA synchronous = NORMAL;
         PRAGMA foreign_keys = ON;",
    )?;
    Ok(conn)
}

pub(crate) fn create_schema(conn: &Connection) -> IndexResult<()> {
    conn.execute_batch(
        r#"
        -- One row describing this generation.
        CREATE TABLE IF NOT EXISTS generation (
            id TEXT PRIMARY KEY,
            embedding_model TEXT NOT NULL,
            dim INTEGER NOT NULL,
            chunk_count INTEGER NOT NULL,
            created_at TEXT NOT NULL
        );

        -- Chunk text + metadata; id is the corpus position.
        CREATE TABLE IF NOT EXISTS chunks (
            id INTEGER PRIMARY KEY,
            content TEXT NOT NULL,
            page INTEGER NOT NULL,
            modality TEXT NOT NULL,
            source TEXT NOT NULL
        );

        -- Vectors, little-endian f32 blobs, same ids.
        CREATE TABLE IF NOT EXISTS embeddings (
            chunk_id INTEGER PRIMARY KEY REFERENCES chunks(id) ON DELETE CASCADE,
            vector BLOB NOT NULL
        );
        "#,
    )?;
    conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    Ok(())
}

/// Write a complete generation in one transaction.
pub(crate) fn write_generation(
    path: &Path,
    info: &GenerationInfo,
    corpus: &[Chunk],
    vectors: &[Vec<f32>],
) -> IndexResult<()> {
    let mut conn = open(path)?;
    create_schema(&conn)?;

    let tx = conn.transaction()?;

    tx.execute(
        "INSERT INTO generation (id, embedding_model, dim, chunk_count, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            info.id,
            info.embedding_model,
            info.dim as i64,
            info.chunk_count as i64,
            info.created_at,
        ],
    )?;

    {
        let mut insert_chunk = tx.prepare(
            "INSERT INTO chunks (id, content, page, modality, source) VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;
        let mut insert_vector =
            tx.prepare("INSERT INTO embeddings (chunk_id, vector) VALUES (?1, ?2)")?;

        for (id, (chunk, vector)) in corpus.iter().zip(vectors.iter()).enumerate() {
            insert_chunk.execute(params![
                id as i64,
                chunk.text,
                chunk.meta.page as i64,
                chunk.meta.modality.as_str(),
                chunk.meta.source,
            ])?;

            let blob: Vec<u8> = vector.iter().flat_map(|v| v.to_le_bytes()).collect();
            insert_vector.execute(params![id as i64, blob])?;
        }
    }

    tx.commit()?;
    info!("Wrote generation {} ({} chunks) to {:?}", info.id, corpus.len(), path);
    Ok(())
}

/// Read the info row.
pub(crate) fn read_info(conn: &Connection) -> IndexResult<GenerationInfo> {
    let mut stmt =
        conn.prepare("SELECT id, embedding_model, dim, chunk_count, created_at FROM generation")?;
    let mut rows = stmt.query([])?;

    let row = rows
        .next()?
        .ok_or_else(|| IndexError::Inconsistent("generation info row is missing".to_string()))?;

    let info = GenerationInfo {
        id: row.get(0)?,
        embedding_model: row.get(1)?,
        dim: row.get::<_, i64>(2)? as usize,
        chunk_count: row.get::<_, i64>(3)? as usize,
        created_at: row.get(4)?,
    };

    if rows.next()?.is_some() {
        return Err(IndexError::Inconsistent(
            "more than one generation info row".to_string(),
        ));
    }

    Ok(info)
}

/// Read all chunks with their vectors, in id order. Ids must be the
/// contiguous range 0..n and every blob must match the declared dimension.
pub(crate) fn read_chunks(
    conn: &Connection,
    dim: usize,
) -> IndexResult<(Vec<Chunk>, Vec<Vec<f32>>)> {
    let mut stmt = conn.prepare(
        "SELECT c.id, c.content, c.page, c.modality, c.source, e.vector
         FROM chunks c
         JOIN embeddings e ON e.chunk_id = c.id
         ORDER BY c.id",
    )?;

    let mut chunks = Vec::new();
    let mut vectors = Vec::new();

    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let id: i64 = row.get(0)?;
        if id as usize != chunks.len() {
            return Err(IndexError::Inconsistent(format!(
                "chunk ids are not contiguous: expected {}, found {}",
                chunks.len(),
                id
            )));
        }

        let modality_str: String = row.get(3)?;
        let modality = Modality::from_str(&modality_str).ok_or_else(|| {
            IndexError::Inconsistent(format!("unknown modality '{}'", modality_str))
        })?;

        chunks.push(Chunk {
            text: row.get(1)?,
            meta: ChunkMeta {
                page: row.get::<_, i64>(2)? as u32,
                modality,
                source: row.get(4)?,
            },
        });

        let blob: Vec<u8> = row.get(5)?;
        if blob.len() != dim * 4 {
            return Err(IndexError::Inconsistent(format!(
                "vector blob for chunk {} has {} bytes, expected {}",
                id,
                blob.len(),
                dim * 4
            )));
        }
        vectors.push(
            blob.chunks_exact(4)
                .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
                .collect(),
        );
    }

    Ok((chunks, vectors))
}
