//! Wavefront OBJ parser
//!
//! Reads `v` and `f` statements; everything else (normals, texture
//! coordinates, groups, materials) is ignored. Vertices may carry a trailing
//! `r g b` colour or a homogeneous `w`, which is ignored. Anything else left
//! on a `v` or `f` line is a parse error. Faces may use `i`, `i/t`, `i//n` or `i/t/n` references with
//! 1-based or negative (relative) indices; polygons are fan-triangulated.
use nom::{
    bytes::complete::{tag, take_till},
    branch::alt,
    character::complete::{char, i64 as signed_index, space1},
    combinator::{all_consuming, map, opt},
    multi::separated_list1,
    number::complete::float,
    sequence::{preceded, terminated, tuple},
    IResult,
};

use crate::error::{Error, Result};
use crate::geometry::{Mesh, Vertex, DEFAULT_VERTEX_COLOR};
use crate::math::Vector3;

/// Parse OBJ source text into a mesh
pub fn parse_obj(input: &str) -> Result<Mesh> {
    let mut mesh = Mesh::new();

    for (number, raw) in input.lines().enumerate() {
        let line = number + 1;
        let statement = strip_comment(raw).trim();

        match statement.split_whitespace().next() {
            Some("v") => {
                let (_, (position, color)) = all_consuming(vertex_statement)(statement)
                    .map_err(|e| parse_error(line, format!("bad vertex: {e}")))?;
                mesh.add_vertex(Vertex::new(position, color.unwrap_or(DEFAULT_VERTEX_COLOR)));
            }
            Some("f") => {
                let (_, refs) = all_consuming(face_statement)(statement)
                    .map_err(|e| parse_error(line, format!("bad face: {e}")))?;
                add_face(&mut mesh, &refs, line)?;
            }
            _ => {}
        }
    }

    Ok(mesh)
}

fn parse_error(line: usize, message: String) -> Error {
    Error::Parse { line, message }
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(i) => &line[..i],
        None => line,
    }
}

fn add_face(mesh: &mut Mesh, refs: &[i64], line: usize) -> Result<()> {
    if refs.len() < 3 {
        return Err(parse_error(
            line,
            format!("face needs at least 3 vertices, got {}", refs.len()),
        ));
    }

    let vertex_count = mesh.vertices.len();
    let indices = refs
        .iter()
        .map(|&r| resolve_index(r, vertex_count).ok_or_else(|| {
            parse_error(line, format!("vertex reference {r} out of range"))
        }))
        .collect::<Result<Vec<u32>>>()?;

    for k in 1..indices.len() - 1 {
        mesh.add_triangle(indices[0], indices[k], indices[k + 1]);
    }
    Ok(())
}

/// Turn a 1-based or negative OBJ reference into a 0-based index
fn resolve_index(reference: i64, vertex_count: usize) -> Option<u32> {
    let count = vertex_count as i64;
    let index = match reference {
        r if r > 0 && r <= count => r - 1,
        r if r < 0 && -r <= count => count + r,
        _ => return None,
    };
    u32::try_from(index).ok()
}

fn vector3(input: &str) -> IResult<&str, Vector3> {
    map(
        tuple((float, preceded(space1, float), preceded(space1, float))),
        |(x, y, z)| Vector3::new(x, y, z),
    )(input)
}

fn vertex_statement(input: &str) -> IResult<&str, (Vector3, Option<Vector3>)> {
    let (input, _) = terminated(tag("v"), space1)(input)?;
    let (input, position) = vector3(input)?;
    let (input, color) = opt(alt((
        map(preceded(space1, vector3), Some),
        map(preceded(space1, float), |_w| None),
    )))(input)?;
    Ok((input, (position, color.flatten())))
}

fn face_reference(input: &str) -> IResult<&str, i64> {
    terminated(
        signed_index,
        opt(preceded(char('/'), take_till(|c: char| c.is_whitespace()))),
    )(input)
}

fn face_statement(input: &str) -> IResult<&str, Vec<i64>> {
    preceded(
        terminated(tag("f"), space1),
        separated_list1(space1, face_reference),
    )(input)
}
