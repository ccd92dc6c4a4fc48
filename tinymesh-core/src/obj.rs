//! Wavefront OBJ subset: `v`, `vn` and triangular `f v/vt/vn` records.
//!
//! Parsing is line oriented and lenient. A line that does not match one of
//! the three records, including faces with other than three corners or a
//! zero index, is skipped. Texture indices are accepted and dropped.

use std::io::{self, Write};

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, digit0, multispace0, space0, space1, u64 as decimal},
    combinator::{all_consuming, map, map_opt},
    number::complete::double,
    sequence::{preceded, tuple},
    IResult,
};
use tracing::debug;

use crate::mesh::Mesh;
use crate::vector::Vector;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Record {
    Vertex(Vector),
    Normal(Vector),
    /// Zero-based `(vertex, normal)` pair per corner.
    Face([(usize, usize); 3]),
}

/// Build a mesh from OBJ text. Never fails; unusable lines are skipped.
pub fn parse(input: &str) -> Mesh {
    let mut vertices = Vec::new();
    let mut normals = Vec::new();
    let mut vertex_indices = Vec::new();
    let mut normal_indices = Vec::new();
    let mut skipped = 0usize;

    for line in input.lines() {
        if line.trim().is_empty() {
            continue;
        }

        match record(line) {
            Ok((_, Record::Vertex(p))) => vertices.push(p),
            Ok((_, Record::Normal(n))) => normals.push(n),
            Ok((_, Record::Face(corners))) => {
                for (v, n) in corners {
                    vertex_indices.push(v);
                    normal_indices.push(n);
                }
            }
            Err(_) => skipped += 1,
        }
    }

    debug!(
        vertices = vertices.len(),
        normals = normals.len(),
        triangles = vertex_indices.len() / 3,
        skipped,
        "parsed OBJ"
    );

    Mesh::from_parts(vertices, normals, vertex_indices, normal_indices)
}

/// Write `mesh` as OBJ: a `g` line, all vertices, all normals, then one
/// `f a//na b//nb c//nc ` line per triangle with one-based indices. Face
/// lines end with a space before the newline.
///
/// Coordinates use the shortest representation that reads back to the
/// same `f64`, so [`parse`] restores the arrays exactly.
pub fn write<W: Write>(writer: &mut W, mesh: &Mesh, name: &str) -> io::Result<()> {
    writeln!(writer, "g {name}")?;

    for v in mesh.vertices() {
        writeln!(writer, "v {} {} {}", v.x, v.y, v.z)?;
    }

    for n in mesh.normals() {
        writeln!(writer, "vn {} {} {}", n.x, n.y, n.z)?;
    }

    let faces = mesh
        .vertex_indices()
        .chunks_exact(3)
        .zip(mesh.normal_indices().chunks_exact(3));
    for (v, n) in faces {
        writeln!(
            writer,
            "f {}//{} {}//{} {}//{} ",
            v[0] + 1,
            n[0] + 1,
            v[1] + 1,
            n[1] + 1,
            v[2] + 1,
            n[2] + 1
        )?;
    }

    Ok(())
}

fn record(line: &str) -> IResult<&str, Record> {
    alt((normal, vertex, face))(line)
}

/// Three whitespace-separated numbers. Anything after the third is ignored.
fn coordinates(input: &str) -> IResult<&str, Vector> {
    map(
        tuple((
            preceded(space1, double),
            preceded(space1, double),
            preceded(space1, double),
        )),
        |(x, y, z)| Vector::new(x, y, z),
    )(input)
}

fn vertex(input: &str) -> IResult<&str, Record> {
    map(preceded(tuple((space0, tag("v"))), coordinates), Record::Vertex)(input)
}

fn normal(input: &str) -> IResult<&str, Record> {
    map(preceded(tuple((space0, tag("vn"))), coordinates), Record::Normal)(input)
}

/// One-based index converted to zero-based. Zero is rejected.
fn index(input: &str) -> IResult<&str, usize> {
    map_opt(decimal, |i| usize::try_from(i).ok()?.checked_sub(1))(input)
}

/// `v/vt/vn` with the texture index optional.
fn corner(input: &str) -> IResult<&str, (usize, usize)> {
    let (input, v) = index(input)?;
    let (input, _) = tuple((char('/'), digit0, char('/')))(input)?;
    let (input, n) = index(input)?;
    Ok((input, (v, n)))
}

fn face(input: &str) -> IResult<&str, Record> {
    let (input, _) = tuple((space0, tag("f")))(input)?;
    let (input, (a, b, c)) = tuple((
        preceded(space1, corner),
        preceded(space1, corner),
        preceded(space1, corner),
    ))(input)?;
    let (input, _) = all_consuming(multispace0)(input)?;
    Ok((input, Record::Face([a, b, c])))
}
