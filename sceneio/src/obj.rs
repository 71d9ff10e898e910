//! Wavefront OBJ

use scenegraph::base::{Float, Vec2, Vec3};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};

/// Geometry of one `o`/`g` group, fan triangulated.
///
/// Positions, normals and texture coordinates are re-indexed into a single
/// index space per shape. Normals are always present; shapes where any face
/// corner lacked one get smooth normals computed over the whole shape.
/// Texture coordinates are empty when the group used none.
#[derive(Clone, Debug, Default)]
pub struct ObjShape {
    /// Group name; empty when the file did not name it.
    pub name: String,

    /// Vertex positions.
    pub positions: Vec<Vec3>,

    /// Vertex normals, one per position.
    pub normals: Vec<Vec3>,

    /// Vertex texture coordinates, one per position, or empty.
    pub texcoords: Vec<Vec2>,

    /// Triangle vertex indices, three per triangle.
    pub indices: Vec<u32>,

    /// Per triangle index into the material list; -1 means no material.
    pub material_ids: Vec<i32>,
}

/// One `newmtl` record from an MTL material library.
#[derive(Clone, Debug)]
pub struct ObjMaterial {
    /// Material name.
    pub name: String,

    /// Ambient color (`Ka`).
    pub ambient: Vec3,

    /// Diffuse color (`Kd`).
    pub diffuse: Vec3,

    /// Specular color (`Ks`).
    pub specular: Vec3,

    /// Transmitted color (`Tf` or `Kt`).
    pub transmittance: Vec3,

    /// Emitted color (`Ke`).
    pub emission: Vec3,

    /// Specular exponent (`Ns`).
    pub shininess: Float,

    /// Index of refraction (`Ni`).
    pub ior: Float,

    /// Opacity (`d`).
    pub dissolve: Float,

    /// Illumination model (`illum`).
    pub illum: i32,

    /// Diffuse texture name (`map_Kd`); empty when absent.
    pub diffuse_texname: String,

    /// Specular texture name (`map_Ks`); empty when absent.
    pub specular_texname: String,

    /// Bump map name (`map_bump` or `bump`); empty when absent.
    pub bump_texname: String,
}

impl Default for ObjMaterial {
    fn default() -> Self {
        Self {
            name: String::new(),
            ambient: Vec3::ZERO,
            diffuse: Vec3::ZERO,
            specular: Vec3::ZERO,
            transmittance: Vec3::ZERO,
            emission: Vec3::ZERO,
            shininess: 1.0,
            ior: 1.0,
            dissolve: 1.0,
            illum: 0,
            diffuse_texname: String::new(),
            specular_texname: String::new(),
            bump_texname: String::new(),
        }
    }
}

/// Loads an OBJ file and the material libraries it references.
///
/// * `filename` - Path to the OBJ file.
/// * `basepath` - Path prepended to material library names.
pub fn load_obj(
    filename: &str,
    basepath: &str,
) -> Result<(Vec<ObjShape>, Vec<ObjMaterial>), String> {
    let file = File::open(filename).map_err(|err| format!("Error opening {}. {}.", filename, err))?;
    let mut parser = ObjParser::new(basepath);
    parser.parse_obj(BufReader::new(file))?;
    Ok(parser.finish())
}

/// Streaming parser state for one OBJ file and its material libraries.
struct ObjParser {
    basepath: String,
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    texcoords: Vec<Vec2>,
    materials: Vec<ObjMaterial>,
    material_index: HashMap<String, i32>,
    shapes: Vec<ObjShape>,
    builder: ShapeBuilder,
}

impl ObjParser {
    fn new(basepath: &str) -> Self {
        Self {
            basepath: String::from(basepath),
            positions: Vec::new(),
            normals: Vec::new(),
            texcoords: Vec::new(),
            materials: Vec::new(),
            material_index: HashMap::new(),
            shapes: Vec::new(),
            builder: ShapeBuilder::new(""),
        }
    }

    /// Parses OBJ statements from a reader.
    fn parse_obj<R: BufRead>(&mut self, reader: R) -> Result<(), String> {
        let mut line_no = 0;
        for line in reader.lines() {
            line_no += 1;
            let line = line.map_err(|err| format!("Error reading line {}. {}.", line_no, err))?;
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.is_empty() || tokens[0].starts_with('#') {
                continue;
            }
            match tokens[0] {
                "v" => self.positions.push(parse_vec3(&tokens, line_no)?),
                "vn" => self.normals.push(parse_vec3(&tokens, line_no)?),
                "vt" => self.texcoords.push(parse_vec2(&tokens, line_no)?),
                "f" => self.face(&tokens, line_no)?,
                "o" | "g" => self.start_shape(tokens.get(1).copied().unwrap_or("")),
                "usemtl" => self.use_material(tokens.get(1).copied().unwrap_or(""), line_no),
                "mtllib" => {
                    for name in &tokens[1..] {
                        self.load_mtl(name)?;
                    }
                }
                // Smoothing groups and unknown statements are skipped.
                _ => (),
            }
        }
        Ok(())
    }

    /// Parses MTL statements from a reader, appending to the material list.
    fn parse_mtl<R: BufRead>(&mut self, reader: R) -> Result<(), String> {
        let mut line_no = 0;
        for line in reader.lines() {
            line_no += 1;
            let line = line.map_err(|err| format!("Error reading line {}. {}.", line_no, err))?;
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.is_empty() || tokens[0].starts_with('#') {
                continue;
            }
            match tokens[0] {
                "newmtl" => {
                    let name = tokens.get(1).copied().unwrap_or("");
                    self.material_index
                        .insert(String::from(name), self.materials.len() as i32);
                    self.materials.push(ObjMaterial {
                        name: String::from(name),
                        ..ObjMaterial::default()
                    });
                }
                "Ka" => {
                    current(&mut self.materials, line_no)?.ambient = parse_vec3(&tokens, line_no)?
                }
                "Kd" => {
                    current(&mut self.materials, line_no)?.diffuse = parse_vec3(&tokens, line_no)?
                }
                "Ks" => {
                    current(&mut self.materials, line_no)?.specular = parse_vec3(&tokens, line_no)?
                }
                "Tf" | "Kt" => {
                    current(&mut self.materials, line_no)?.transmittance =
                        parse_vec3(&tokens, line_no)?
                }
                "Ke" => {
                    current(&mut self.materials, line_no)?.emission = parse_vec3(&tokens, line_no)?
                }
                "Ns" => {
                    current(&mut self.materials, line_no)?.shininess = scalar(&tokens, line_no)?
                }
                "Ni" => current(&mut self.materials, line_no)?.ior = scalar(&tokens, line_no)?,
                "d" => current(&mut self.materials, line_no)?.dissolve = scalar(&tokens, line_no)?,
                "illum" => {
                    current(&mut self.materials, line_no)?.illum = scalar(&tokens, line_no)? as i32
                }
                "map_Kd" => {
                    current(&mut self.materials, line_no)?.diffuse_texname = texture_name(&tokens)
                }
                "map_Ks" => {
                    current(&mut self.materials, line_no)?.specular_texname = texture_name(&tokens)
                }
                "map_bump" | "map_Bump" | "bump" => {
                    current(&mut self.materials, line_no)?.bump_texname = texture_name(&tokens)
                }
                _ => (),
            }
        }
        Ok(())
    }

    /// Returns the parsed shapes and materials.
    fn finish(mut self) -> (Vec<ObjShape>, Vec<ObjMaterial>) {
        let builder = std::mem::replace(&mut self.builder, ShapeBuilder::new(""));
        if let Some(shape) = builder.finish() {
            self.shapes.push(shape);
        }
        (self.shapes, self.materials)
    }

    fn face(&mut self, tokens: &[&str], line_no: usize) -> Result<(), String> {
        if tokens.len() < 4 {
            return Err(format!("Face with fewer than 3 vertices on line {}", line_no));
        }
        let mut corners = Vec::with_capacity(tokens.len() - 1);
        for token in &tokens[1..] {
            corners.push(self.resolve_corner(token, line_no)?);
        }
        // Fan triangulate.
        for i in 1..corners.len() - 1 {
            let a = self
                .builder
                .add_vertex(corners[0], &self.positions, &self.normals, &self.texcoords);
            let b = self
                .builder
                .add_vertex(corners[i], &self.positions, &self.normals, &self.texcoords);
            let c = self
                .builder
                .add_vertex(corners[i + 1], &self.positions, &self.normals, &self.texcoords);
            self.builder.indices.extend([a, b, c]);
            self.builder.material_ids.push(self.builder.current_material);
        }
        Ok(())
    }

    /// Resolves one `v`, `v/vt`, `v//vn` or `v/vt/vn` reference into absolute
    /// indices; -1 marks an absent component.
    fn resolve_corner(&self, token: &str, line_no: usize) -> Result<(i32, i32, i32), String> {
        let mut parts = token.split('/');
        let v = resolve_index(parts.next(), self.positions.len(), true, token, line_no)?;
        let vt = resolve_index(parts.next(), self.texcoords.len(), false, token, line_no)?;
        let vn = resolve_index(parts.next(), self.normals.len(), false, token, line_no)?;
        if parts.next().is_some() {
            return Err(format!("Invalid face vertex '{}' on line {}", token, line_no));
        }
        Ok((v, vt, vn))
    }

    fn start_shape(&mut self, name: &str) {
        // Material state persists across group statements.
        let material = self.builder.current_material;
        let builder = std::mem::replace(&mut self.builder, ShapeBuilder::new(name));
        self.builder.current_material = material;
        if let Some(shape) = builder.finish() {
            self.shapes.push(shape);
        }
    }

    fn use_material(&mut self, name: &str, line_no: usize) {
        match self.material_index.get(name) {
            Some(id) => self.builder.current_material = *id,
            None => {
                warn!("Unknown material '{}' on line {}", name, line_no);
                self.builder.current_material = -1;
            }
        }
    }

    fn load_mtl(&mut self, name: &str) -> Result<(), String> {
        let path = format!("{}{}", self.basepath, name);
        match File::open(&path) {
            Ok(file) => self.parse_mtl(BufReader::new(file)),
            Err(err) => {
                // A missing library only costs the material bindings.
                warn!("Missing material library {}. {}.", path, err);
                Ok(())
            }
        }
    }
}

/// Accumulates one shape, re-indexing `(v, vt, vn)` triples as they appear.
struct ShapeBuilder {
    name: String,
    index_of: HashMap<(i32, i32, i32), u32>,
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    texcoords: Vec<Vec2>,
    indices: Vec<u32>,
    material_ids: Vec<i32>,
    current_material: i32,
    missing_normal: bool,
    has_texcoord: bool,
}

impl ShapeBuilder {
    fn new(name: &str) -> Self {
        Self {
            name: String::from(name),
            index_of: HashMap::new(),
            positions: Vec::new(),
            normals: Vec::new(),
            texcoords: Vec::new(),
            indices: Vec::new(),
            material_ids: Vec::new(),
            current_material: -1,
            missing_normal: false,
            has_texcoord: false,
        }
    }

    fn add_vertex(
        &mut self,
        key: (i32, i32, i32),
        positions: &[Vec3],
        normals: &[Vec3],
        texcoords: &[Vec2],
    ) -> u32 {
        if let Some(index) = self.index_of.get(&key) {
            return *index;
        }
        let index = self.positions.len() as u32;
        let (v, vt, vn) = key;
        self.positions.push(positions[v as usize]);
        if vt >= 0 {
            self.texcoords.push(texcoords[vt as usize]);
            self.has_texcoord = true;
        } else {
            self.texcoords.push(Vec2::ZERO);
        }
        if vn >= 0 {
            self.normals.push(normals[vn as usize]);
        } else {
            self.normals.push(Vec3::ZERO);
            self.missing_normal = true;
        }
        self.index_of.insert(key, index);
        index
    }

    fn finish(self) -> Option<ObjShape> {
        if self.indices.is_empty() {
            return None;
        }
        let normals = if self.missing_normal {
            smooth_normals(&self.positions, &self.indices)
        } else {
            self.normals
        };
        let texcoords = if self.has_texcoord {
            self.texcoords
        } else {
            Vec::new()
        };
        Some(ObjShape {
            name: self.name,
            positions: self.positions,
            normals,
            texcoords,
            indices: self.indices,
            material_ids: self.material_ids,
        })
    }
}

/// Area weighted smooth vertex normals.
fn smooth_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];
    for triangle in indices.chunks_exact(3) {
        let a = positions[triangle[0] as usize];
        let b = positions[triangle[1] as usize];
        let c = positions[triangle[2] as usize];
        let normal = (b - a).cross(c - a);
        for index in triangle {
            normals[*index as usize] += normal;
        }
    }
    for normal in normals.iter_mut() {
        *normal = normal.normalize_or_zero();
    }
    normals
}

fn resolve_index(
    part: Option<&str>,
    count: usize,
    required: bool,
    token: &str,
    line_no: usize,
) -> Result<i32, String> {
    let part = match part {
        Some(part) if !part.is_empty() => part,
        _ if required => return Err(format!("Invalid face vertex '{}' on line {}", token, line_no)),
        _ => return Ok(-1),
    };
    let index: i32 = part
        .parse()
        .map_err(|_| format!("Invalid face vertex '{}' on line {}", token, line_no))?;
    // Indices count from 1; negative values are relative to the end.
    let resolved = if index > 0 {
        index - 1
    } else {
        count as i32 + index
    };
    if index == 0 || resolved < 0 || resolved as usize >= count {
        return Err(format!("Index {} out of range on line {}", index, line_no));
    }
    Ok(resolved)
}

fn current<'a>(
    materials: &'a mut [ObjMaterial],
    line_no: usize,
) -> Result<&'a mut ObjMaterial, String> {
    materials
        .last_mut()
        .ok_or_else(|| format!("Material property before newmtl on line {}", line_no))
}

fn parse_float(token: &str, line_no: usize) -> Result<Float, String> {
    token
        .parse()
        .map_err(|_| format!("Invalid number '{}' on line {}", token, line_no))
}

fn parse_vec3(tokens: &[&str], line_no: usize) -> Result<Vec3, String> {
    if tokens.len() < 4 {
        return Err(format!("Expected 3 values for '{}' on line {}", tokens[0], line_no));
    }
    Ok(Vec3::new(
        parse_float(tokens[1], line_no)?,
        parse_float(tokens[2], line_no)?,
        parse_float(tokens[3], line_no)?,
    ))
}

fn parse_vec2(tokens: &[&str], line_no: usize) -> Result<Vec2, String> {
    if tokens.len() < 3 {
        return Err(format!("Expected 2 values for '{}' on line {}", tokens[0], line_no));
    }
    Ok(Vec2::new(
        parse_float(tokens[1], line_no)?,
        parse_float(tokens[2], line_no)?,
    ))
}

fn scalar(tokens: &[&str], line_no: usize) -> Result<Float, String> {
    if tokens.len() < 2 {
        return Err(format!("Expected a value for '{}' on line {}", tokens[0], line_no));
    }
    parse_float(tokens[1], line_no)
}

/// Options like `-bm` come before the file name, so the name is the last
/// token.
fn texture_name(tokens: &[&str]) -> String {
    if tokens.len() < 2 {
        String::new()
    } else {
        String::from(tokens[tokens.len() - 1])
    }
}
