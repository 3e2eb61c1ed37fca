//! Minimal Wavefront OBJ reader for triangulated meshes.
//!
//! Only `v`, `vn`, `vt` and `f` records are read; materials, groups and
//! everything else are skipped. Every face corner becomes its own vertex.

use std::fs::File;
use std::io::{ BufRead, BufReader };
use std::path::Path;

use thiserror::Error;

use crate::engine::components::Vertex;
use crate::engine::geometry::MeshData;

#[derive(Debug, Error)]
pub enum ObjError {
    #[error("failed to read OBJ data: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: malformed `{tag}` record")]
    Malformed { line: usize, tag: String },
    #[error("line {line}: face has {corners} corners, only triangles are supported")]
    NonTriangularFace { line: usize, corners: usize },
    #[error("line {line}: {kind} index {index} out of range")]
    IndexOutOfRange { line: usize, kind: &'static str, index: i64 },
}

pub fn load_obj(path: impl AsRef<Path>) -> Result<MeshData, ObjError> {
    let path = path.as_ref();
    let mesh = parse_obj(BufReader::new(File::open(path)?))?;
    log::info!(
        "Loaded OBJ {}: {} triangles, bounds {:?}",
        path.display(),
        mesh.triangle_count,
        mesh.bounds()
    );
    Ok(mesh)
}

pub fn parse_obj(reader: impl BufRead) -> Result<MeshData, ObjError> {
    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut normals: Vec<[f32; 3]> = Vec::new();
    let mut tex_coords: Vec<[f32; 2]> = Vec::new();
    let mut vertices = Vec::new();

    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = number + 1;
        let mut fields = line.split_whitespace();
        let Some(tag) = fields.next() else {
            continue;
        };

        match tag {
            "v" => positions.push(parse_floats(fields, line_no, tag)?),
            "vn" => normals.push(parse_floats(fields, line_no, tag)?),
            "vt" => tex_coords.push(parse_floats(fields, line_no, tag)?),
            "f" => {
                let corners: Vec<&str> = fields.collect();
                if corners.len() != 3 {
                    return Err(ObjError::NonTriangularFace { line: line_no, corners: corners.len() });
                }
                for corner in corners {
                    let (v, t, n) = parse_corner(corner, line_no)?;
                    let position = *lookup(&positions, v, line_no, "vertex")?;
                    let uv = match t {
                        Some(t) => *lookup(&tex_coords, t, line_no, "texcoord")?,
                        None => [0.0; 2],
                    };
                    let normal = match n {
                        Some(n) => *lookup(&normals, n, line_no, "normal")?,
                        None => [0.0; 3],
                    };
                    vertices.push(Vertex::new(position, normal, uv));
                }
            }
            _ => {}
        }
    }

    let triangle_count = vertices.len() / 3;
    let indices = (0..vertices.len() as u32).collect();
    Ok(MeshData::new(vertices, indices, triangle_count))
}

fn parse_floats<const N: usize>(
    fields: std::str::SplitWhitespace<'_>,
    line: usize,
    tag: &str
) -> Result<[f32; N], ObjError> {
    let malformed = || ObjError::Malformed { line, tag: tag.to_string() };
    let values: Vec<f32> = fields
        .take(N)
        .map(|f| f.parse::<f32>().map_err(|_| malformed()))
        .collect::<Result<_, _>>()?;
    values.try_into().map_err(|_| malformed())
}

/// Splits `v/t/n`, `v//n`, `v/t` or `v` into 1-based (possibly negative) indices.
fn parse_corner(corner: &str, line: usize) -> Result<(i64, Option<i64>, Option<i64>), ObjError> {
    let malformed = || ObjError::Malformed { line, tag: "f".to_string() };
    let mut parts = corner.split('/');
    let parse = |s: Option<&str>| -> Result<Option<i64>, ObjError> {
        match s {
            None | Some("") => Ok(None),
            Some(s) => s.parse::<i64>().map(Some).map_err(|_| malformed()),
        }
    };
    let v = parse(parts.next())?.ok_or_else(malformed)?;
    let t = parse(parts.next())?;
    let n = parse(parts.next())?;
    if parts.next().is_some() {
        return Err(malformed());
    }
    Ok((v, t, n))
}

/// Resolves a 1-based OBJ index; negative indices count back from the end.
fn lookup<'a, T>(items: &'a [T], index: i64, line: usize, kind: &'static str) -> Result<&'a T, ObjError> {
    let resolved = if index < 0 { items.len() as i64 + index } else { index - 1 };
    usize::try_from(resolved)
        .ok()
        .and_then(|i| items.get(i))
        .ok_or(ObjError::IndexOutOfRange { line, kind, index })
}
