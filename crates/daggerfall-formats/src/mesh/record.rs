//! Decoded mesh structure and the ARCH3D record decoder

use crate::BsaRecord;
use crate::mesh::error::{MeshError, Result};
use crate::mesh::header::{
    Arch3dHeader, HEADER_SIZE, MeshVersion, PLANE_HEADER_SIZE, PLANE_POINT_SIZE, PlaneHeader,
    PlanePoint, TextureRef, VECTOR_SIZE,
};
use binrw::BinRead;
use std::io::{Cursor, Seek, SeekFrom};

/// A single mesh vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vertex {
    /// Position from the point list
    pub position: [i32; 3],
    /// Normal of the plane the vertex belongs to
    pub normal: [i32; 3],
    /// Texture U coordinate as stored
    pub u: i16,
    /// Texture V coordinate as stored
    pub v: i16,
}

/// One polygon (ARCH3D plane)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Face {
    /// Vertices in winding order
    pub vertices: Vec<Vertex>,
}

/// Faces sharing a texture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubMesh {
    /// Texture the faces are drawn with
    pub texture: TextureRef,
    /// Faces in record order
    pub faces: Vec<Face>,
}

impl SubMesh {
    /// Texture bank number
    pub fn texture_archive(&self) -> u16 {
        self.texture.archive
    }

    /// Record index within the texture bank
    pub fn texture_record(&self) -> u8 {
        self.texture.record
    }

    /// Number of vertices across all faces
    pub fn vertex_count(&self) -> usize {
        self.faces.iter().map(|f| f.vertices.len()).sum()
    }
}

/// Decoded ARCH3D object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mesh {
    /// Object id from the archive directory
    pub object_id: u32,
    /// Format revision
    pub version: MeshVersion,
    /// Bounding radius
    pub radius: i32,
    /// Total vertices across all sub-meshes
    pub total_vertices: usize,
    /// Sub-meshes in order of first texture appearance
    pub sub_meshes: Vec<SubMesh>,
}

impl Mesh {
    /// Decode an ARCH3D record
    pub fn parse(object_id: u32, data: &[u8]) -> Result<Self> {
        require(data, 0, HEADER_SIZE, "header")?;

        let mut cursor = Cursor::new(data);
        let header = Arch3dHeader::read(&mut cursor)?;
        let version = MeshVersion::from_tag(header.version)?;

        let point_count = count("point count", header.point_count)?;
        let plane_count = count("plane count", header.plane_count)?;

        let points = read_vectors(
            &mut cursor,
            data,
            header.point_list_offset,
            point_count,
            "point list",
        )?;
        let normals = read_vectors(
            &mut cursor,
            data,
            header.normal_list_offset,
            plane_count,
            "normal list",
        )?;

        let mut position = offset("plane list", header.plane_list_offset)?;
        let mut sub_meshes: Vec<SubMesh> = Vec::new();
        let mut total_vertices = 0;

        for (plane_index, normal) in normals.iter().enumerate() {
            require(data, position, PLANE_HEADER_SIZE, "plane header")?;
            cursor.seek(SeekFrom::Start(position as u64))?;
            let plane = PlaneHeader::read(&mut cursor)?;
            position += PLANE_HEADER_SIZE;

            let points_len = plane.point_count as usize * PLANE_POINT_SIZE;
            require(data, position, points_len, "plane points")?;
            position += points_len;

            let mut vertices = Vec::with_capacity(plane.point_count as usize);
            for _ in 0..plane.point_count {
                let point = PlanePoint::read(&mut cursor)?;
                let index = point_index(version, point.point_offset, point_count, plane_index)?;
                vertices.push(Vertex {
                    position: points[index],
                    normal: *normal,
                    u: point.u,
                    v: point.v,
                });
            }
            total_vertices += vertices.len();

            let texture = TextureRef::from_packed(plane.texture);
            let face = Face { vertices };
            match sub_meshes.iter_mut().find(|s| s.texture == texture) {
                Some(sub_mesh) => sub_mesh.faces.push(face),
                None => sub_meshes.push(SubMesh {
                    texture,
                    faces: vec![face],
                }),
            }
        }

        Ok(Self {
            object_id,
            version,
            radius: header.radius,
            total_vertices,
            sub_meshes,
        })
    }

    /// Number of faces across all sub-meshes
    pub fn face_count(&self) -> usize {
        self.sub_meshes.iter().map(|s| s.faces.len()).sum()
    }

    /// Distinct textures used by the mesh
    pub fn textures(&self) -> impl Iterator<Item = TextureRef> + '_ {
        self.sub_meshes.iter().map(|s| s.texture)
    }
}

impl BsaRecord for Mesh {
    type Error = MeshError;

    fn parse_record(name: &str, data: &[u8]) -> Result<Self> {
        let object_id = name
            .parse::<u32>()
            .map_err(|_| MeshError::InvalidObjectId(name.to_string()))?;
        Self::parse(object_id, data)
    }
}

fn require(data: &[u8], offset: usize, length: usize, section: &'static str) -> Result<()> {
    let expected = offset.saturating_add(length);
    if expected > data.len() {
        return Err(MeshError::Truncated {
            section,
            expected,
            actual: data.len(),
        });
    }
    Ok(())
}

fn count(what: &str, value: i32) -> Result<usize> {
    usize::try_from(value).map_err(|_| MeshError::Malformed(format!("negative {what}: {value}")))
}

fn offset(what: &str, value: i32) -> Result<usize> {
    usize::try_from(value)
        .map_err(|_| MeshError::Malformed(format!("negative {what} offset: {value}")))
}

fn read_vectors(
    cursor: &mut Cursor<&[u8]>,
    data: &[u8],
    list_offset: i32,
    count: usize,
    section: &'static str,
) -> Result<Vec<[i32; 3]>> {
    let start = offset(section, list_offset)?;
    require(data, start, count.saturating_mul(VECTOR_SIZE), section)?;
    cursor.seek(SeekFrom::Start(start as u64))?;

    let mut vectors = Vec::with_capacity(count);
    for _ in 0..count {
        vectors.push(<[i32; 3]>::read_le(cursor)?);
    }
    Ok(vectors)
}

fn point_index(
    version: MeshVersion,
    point_offset: i32,
    point_count: usize,
    plane_index: usize,
) -> Result<usize> {
    let divisor = version.point_divisor();
    if point_offset < 0 || point_offset % divisor != 0 {
        return Err(MeshError::Malformed(format!(
            "plane {plane_index}: point offset {point_offset} is not a multiple of {divisor}"
        )));
    }
    let index = (point_offset / divisor) as usize;
    if index >= point_count {
        return Err(MeshError::Malformed(format!(
            "plane {plane_index}: point {index} out of range ({point_count} points)"
        )));
    }
    Ok(index)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::{MeshFixture, PlaneFixture};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn quad_and_triangle() -> MeshFixture {
        MeshFixture {
            version: *b"v2.7",
            radius: 512,
            points: vec![[0, 0, 0], [100, 0, 0], [100, 100, 0], [0, 100, 0]],
            planes: vec![
                PlaneFixture {
                    texture: TextureRef {
                        archive: 112,
                        record: 3,
                    },
                    normal: [0, 0, 256],
                    points: vec![(0, 0, 0), (1, 64, 0), (2, 64, 64), (3, 0, 64)],
                },
                PlaneFixture {
                    texture: TextureRef {
                        archive: 40,
                        record: 0,
                    },
                    normal: [0, 256, 0],
                    points: vec![(0, 0, 0), (1, 8, 0), (2, 8, 8)],
                },
                PlaneFixture {
                    texture: TextureRef {
                        archive: 112,
                        record: 3,
                    },
                    normal: [256, 0, 0],
                    points: vec![(1, 1, 1), (2, 2, 2), (3, 3, 3)],
                },
            ],
        }
    }

    #[test]
    fn test_decode_groups_by_texture() {
        let data = quad_and_triangle().build();
        let mesh = Mesh::parse(456, &data).expect("Should decode mesh");

        assert_eq!(mesh.object_id, 456);
        assert_eq!(mesh.version, MeshVersion::V27);
        assert_eq!(mesh.radius, 512);
        assert_eq!(mesh.total_vertices, 10);
        assert_eq!(mesh.face_count(), 3);
        assert_eq!(mesh.sub_meshes.len(), 2);

        let first = &mesh.sub_meshes[0];
        assert_eq!(first.texture_archive(), 112);
        assert_eq!(first.texture_record(), 3);
        assert_eq!(first.faces.len(), 2);
        assert_eq!(first.vertex_count(), 7);
        assert_eq!(
            first.faces[0].vertices[2],
            Vertex {
                position: [100, 100, 0],
                normal: [0, 0, 256],
                u: 64,
                v: 64,
            }
        );

        let second = &mesh.sub_meshes[1];
        assert_eq!(second.texture_archive(), 40);
        assert_eq!(second.faces[0].vertices.len(), 3);
    }

    #[test]
    fn test_v25_point_offsets() {
        let mut fixture = quad_and_triangle();
        fixture.version = *b"v2.5";
        let mesh = Mesh::parse(1, &fixture.build()).expect("Should decode v2.5 mesh");
        assert_eq!(mesh.version, MeshVersion::V25);
        assert_eq!(mesh.sub_meshes[0].faces[0].vertices[1].position, [100, 0, 0]);
    }

    #[test]
    fn test_decode_is_deterministic() {
        let data = quad_and_triangle().build();
        let a = Mesh::parse(9, &data).unwrap();
        let b = Mesh::parse(9, &data).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_truncated_header() {
        let data = vec![0u8; 10];
        assert!(matches!(
            Mesh::parse(1, &data),
            Err(MeshError::Truncated {
                section: "header",
                expected: 64,
                actual: 10
            })
        ));
    }

    #[test]
    fn test_plane_count_past_record_end() {
        let mut data = quad_and_triangle().build();
        // plane_count lives at byte 8
        data[8..12].copy_from_slice(&1000i32.to_le_bytes());
        let err = Mesh::parse(1, &data).unwrap_err();
        assert!(matches!(err, MeshError::Truncated { .. }));
        assert!(err.is_corrupt());
    }

    #[test]
    fn test_point_offset_out_of_range() {
        let mut fixture = quad_and_triangle();
        fixture.planes[1].points[2].0 = 9;
        let err = Mesh::parse(1, &fixture.build()).unwrap_err();
        assert!(matches!(err, MeshError::Malformed(_)));
    }

    #[test]
    fn test_negative_count() {
        let mut data = quad_and_triangle().build();
        data[4..8].copy_from_slice(&(-1i32).to_le_bytes());
        assert!(matches!(
            Mesh::parse(1, &data),
            Err(MeshError::Malformed(_))
        ));
    }

    #[test]
    fn test_unsupported_version() {
        let mut data = quad_and_triangle().build();
        data[0..4].copy_from_slice(b"v9.9");
        assert!(matches!(
            Mesh::parse(1, &data),
            Err(MeshError::UnsupportedVersion(_))
        ));
    }

    #[test]
    fn test_record_name_must_be_numeric() {
        let data = quad_and_triangle().build();
        assert!(matches!(
            Mesh::parse_record("HOUSE", &data),
            Err(MeshError::InvalidObjectId(_))
        ));
        assert_eq!(Mesh::parse_record("4000", &data).unwrap().object_id, 4000);
    }

    #[test]
    fn test_empty_mesh() {
        let fixture = MeshFixture {
            version: *b"v2.6",
            radius: 0,
            points: vec![],
            planes: vec![],
        };
        let mesh = Mesh::parse(2, &fixture.build()).unwrap();
        assert_eq!(mesh.total_vertices, 0);
        assert!(mesh.sub_meshes.is_empty());
    }

    proptest! {
        /// Truncated or damaged records are rejected, never decoded partially
        #[test]
        fn damaged_records_do_not_panic(
            cut in 0usize..200,
            flips in prop::collection::vec((0usize..200, any::<u8>()), 0..8),
        ) {
            let mut data = quad_and_triangle().build();
            for (position, value) in flips {
                if let Some(byte) = data.get_mut(position) {
                    *byte = value;
                }
            }
            data.truncate(cut.min(data.len()));
            if let Ok(mesh) = Mesh::parse(7, &data) {
                let counted: usize = mesh.sub_meshes.iter().map(SubMesh::vertex_count).sum();
                prop_assert_eq!(mesh.total_vertices, counted);
            }
        }
    }
}
