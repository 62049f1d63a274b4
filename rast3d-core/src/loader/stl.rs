//! STL parser for binary and ASCII formats
//!
//! STL stores unindexed facets; each facet becomes three new vertices with
//! the default colour. Facet normals are read and discarded.
use nom::{
    bytes::complete::{tag, take},
    character::complete::{multispace0, multispace1, not_line_ending},
    multi::{count, many0},
    number::complete::{float, le_f32, le_u16, le_u32},
    sequence::{preceded, tuple},
    IResult,
};

use crate::error::{Error, Result};
use crate::geometry::{Mesh, Vertex};
use crate::math::Vector3;

const HEADER_LEN: usize = 80;
const FACET_LEN: usize = 50;

type Facet = [Vector3; 3];

/// Parse a binary STL file
pub fn parse_binary_stl(data: &[u8]) -> Result<Mesh> {
    if data.len() < HEADER_LEN + 4 {
        return Err(Error::Stl("file too small to be a valid STL".to_string()));
    }

    let (body, declared) = binary_header(data).map_err(|e| nom_error("bad header", e))?;
    let triangle_count = declared as usize;
    if body.len() < triangle_count.saturating_mul(FACET_LEN) {
        return Err(Error::Stl(format!(
            "header declares {triangle_count} facets but only {} bytes follow",
            body.len()
        )));
    }

    let (_, facets) =
        count(binary_facet, triangle_count)(body).map_err(|e| nom_error("bad facet", e))?;
    Ok(mesh_from_facets(facets))
}

fn binary_header(input: &[u8]) -> IResult<&[u8], u32> {
    preceded(take(HEADER_LEN), le_u32)(input)
}

fn le_vector3(input: &[u8]) -> IResult<&[u8], Vector3> {
    let (input, (x, y, z)) = tuple((le_f32, le_f32, le_f32))(input)?;
    Ok((input, Vector3::new(x, y, z)))
}

fn binary_facet(input: &[u8]) -> IResult<&[u8], Facet> {
    let (input, _normal) = le_vector3(input)?;
    let (input, a) = le_vector3(input)?;
    let (input, b) = le_vector3(input)?;
    let (input, c) = le_vector3(input)?;
    let (input, _attribute_bytes) = le_u16(input)?;
    Ok((input, [a, b, c]))
}

/// Parse an ASCII STL file
pub fn parse_ascii_stl(input: &str) -> Result<Mesh> {
    match ascii_stl(input) {
        Ok((_, facets)) => Ok(mesh_from_facets(facets)),
        Err(e) => Err(nom_error("failed to parse ASCII STL", e)),
    }
}

/// Report only the error kind; the remaining input can be the whole file
fn nom_error<I>(context: &str, e: nom::Err<nom::error::Error<I>>) -> Error {
    Error::Stl(format!("{context}: {:?}", e.map(|inner| inner.code)))
}

fn ascii_stl(input: &str) -> IResult<&str, Vec<Facet>> {
    let (input, _) = preceded(multispace0, tag("solid"))(input)?;
    let (input, _name) = not_line_ending(input)?;
    let (input, facets) = many0(ascii_facet)(input)?;
    let (input, _) = preceded(multispace0, tag("endsolid"))(input)?;
    let (input, _name) = not_line_ending(input)?;
    Ok((input, facets))
}

fn ascii_facet(input: &str) -> IResult<&str, Facet> {
    let (input, _) = preceded(multispace0, tag("facet"))(input)?;
    let (input, _) = preceded(multispace1, tag("normal"))(input)?;
    let (input, _normal) = ascii_vector3(input)?;
    let (input, _) = preceded(multispace0, tag("outer"))(input)?;
    let (input, _) = preceded(multispace1, tag("loop"))(input)?;
    let (input, a) = ascii_vertex(input)?;
    let (input, b) = ascii_vertex(input)?;
    let (input, c) = ascii_vertex(input)?;
    let (input, _) = preceded(multispace0, tag("endloop"))(input)?;
    let (input, _) = preceded(multispace0, tag("endfacet"))(input)?;
    Ok((input, [a, b, c]))
}

fn ascii_vertex(input: &str) -> IResult<&str, Vector3> {
    preceded(preceded(multispace0, tag("vertex")), ascii_vector3)(input)
}

fn ascii_vector3(input: &str) -> IResult<&str, Vector3> {
    let (input, _) = multispace0(input)?;
    let (input, x) = float(input)?;
    let (input, _) = multispace1(input)?;
    let (input, y) = float(input)?;
    let (input, _) = multispace1(input)?;
    let (input, z) = float(input)?;
    Ok((input, Vector3::new(x, y, z)))
}

fn mesh_from_facets(facets: Vec<Facet>) -> Mesh {
    let mut mesh = Mesh::with_capacity(facets.len() * 3, facets.len());
    for [a, b, c] in facets {
        let ia = mesh.add_vertex(Vertex::uncolored(a));
        let ib = mesh.add_vertex(Vertex::uncolored(b));
        let ic = mesh.add_vertex(Vertex::uncolored(c));
        mesh.add_triangle(ia, ib, ic);
    }
    mesh
}

/// Detect and parse STL data (ASCII or binary)
///
/// Binary files may also start with `solid`, so ASCII is only chosen when
/// it parses.
pub fn parse_stl(data: &[u8]) -> Result<Mesh> {
    if data.starts_with(b"solid") {
        if let Ok(text) = std::str::from_utf8(data) {
            if let Ok(mesh) = parse_ascii_stl(text) {
                return Ok(mesh);
            }
        }
    }

    parse_binary_stl(data)
}
