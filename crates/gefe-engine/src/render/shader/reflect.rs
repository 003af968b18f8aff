use std::collections::{BTreeMap, HashMap};

use wgpu::naga::{self, AddressSpace, Binding, Handle, ScalarKind, TypeInner, VectorSize};

use super::source::ShaderStage;
use crate::render::backend::{StageVisibility, UniformBlock};

/// Shape of a reflected uniform, as far as uploads care.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum UniformKind {
    /// `mat4`, 16 column-major `f32`s.
    Mat4,
    Other,
}

/// Where a named uniform lives inside the program's uniform blocks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct UniformSlot {
    pub binding: u32,
    /// Byte offset inside the block.
    pub offset: u32,
    pub kind: UniformKind,
}

/// Name → slot lookup plus the block list a backend needs for linking.
#[derive(Debug, Default, Clone)]
pub struct UniformTable {
    slots: HashMap<String, UniformSlot>,
    blocks: Vec<UniformBlock>,
}

impl UniformTable {
    #[inline]
    pub fn get(&self, name: &str) -> Option<UniformSlot> {
        self.slots.get(name).copied()
    }

    /// Uniform blocks ordered by binding.
    #[inline]
    pub fn blocks(&self) -> &[UniformBlock] {
        &self.blocks
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn add_block(&mut self, binding: u32, size: u32, stage: ShaderStage, problems: &mut Vec<String>) {
        if let Some(block) = self.blocks.iter_mut().find(|b| b.binding == binding) {
            if block.size != size {
                problems.push(format!(
                    "uniform block at binding {binding} is {} bytes in one stage and {size} in the {stage} stage",
                    block.size
                ));
            }
            block.visibility.insert(stage);
            return;
        }

        let mut visibility = StageVisibility::default();
        visibility.insert(stage);
        self.blocks.push(UniformBlock {
            binding,
            size,
            visibility,
        });
    }

    fn insert(&mut self, name: &str, slot: UniformSlot, problems: &mut Vec<String>) {
        match self.slots.get(name) {
            Some(existing) if *existing != slot => {
                problems.push(format!("uniform `{name}` is declared differently in each stage"));
            }
            Some(_) => {}
            None => {
                self.slots.insert(name.to_string(), slot);
            }
        }
    }
}

/// Checks the stage interfaces against each other and against the fixed
/// vertex layout, and reflects the uniforms of both stages.
///
/// Every problem found is reported, not just the first.
pub(crate) fn link_interface(
    vertex: &naga::Module,
    fragment: &naga::Module,
) -> Result<UniformTable, Vec<String>> {
    let mut problems = Vec::new();

    let vs_inputs = stage_io(vertex, Direction::Input, &mut problems);
    let vs_outputs = stage_io(vertex, Direction::Output, &mut problems);
    let fs_inputs = stage_io(fragment, Direction::Input, &mut problems);

    for (location, inner) in &vs_inputs {
        let expected = match location {
            0 => vector(VectorSize::Tri),
            1 => vector(VectorSize::Quad),
            _ => {
                problems.push(format!(
                    "vertex input at location {location} has no matching vertex attribute"
                ));
                continue;
            }
        };
        if **inner != expected {
            problems.push(format!(
                "vertex input at location {location} is {}, expected {}",
                describe(inner),
                describe(&expected)
            ));
        }
    }

    for (location, inner) in &fs_inputs {
        match vs_outputs.get(location) {
            None => problems.push(format!(
                "fragment input at location {location} is not written by the vertex stage"
            )),
            Some(out) if out != inner => problems.push(format!(
                "location {location} is {} in the vertex stage but {} in the fragment stage",
                describe(out),
                describe(inner)
            )),
            Some(_) => {}
        }
    }

    let mut table = UniformTable::default();
    collect_uniforms(ShaderStage::Vertex, vertex, &mut table, &mut problems);
    collect_uniforms(ShaderStage::Fragment, fragment, &mut table, &mut problems);
    table.blocks.sort_by_key(|b| b.binding);

    if problems.is_empty() {
        Ok(table)
    } else {
        Err(problems)
    }
}

#[derive(Copy, Clone)]
enum Direction {
    Input,
    Output,
}

fn stage_io<'m>(
    module: &'m naga::Module,
    dir: Direction,
    problems: &mut Vec<String>,
) -> BTreeMap<u32, &'m TypeInner> {
    let mut out = BTreeMap::new();
    let Some(ep) = module.entry_points.first() else {
        problems.push("stage has no entry point".to_string());
        return out;
    };

    match dir {
        Direction::Input => {
            for arg in &ep.function.arguments {
                located(module, arg.ty, arg.binding.as_ref(), &mut out);
            }
        }
        Direction::Output => {
            if let Some(result) = &ep.function.result {
                located(module, result.ty, result.binding.as_ref(), &mut out);
            }
        }
    }
    out
}

/// Collects user locations, descending into unbound structs. Built-ins are skipped.
fn located<'m>(
    module: &'m naga::Module,
    ty: Handle<naga::Type>,
    binding: Option<&Binding>,
    out: &mut BTreeMap<u32, &'m TypeInner>,
) {
    let inner = &module.types[ty].inner;
    match binding {
        Some(Binding::Location { location, .. }) => {
            out.insert(*location, inner);
        }
        Some(Binding::BuiltIn(_)) => {}
        None => {
            if let TypeInner::Struct { members, .. } = inner {
                for m in members {
                    located(module, m.ty, m.binding.as_ref(), out);
                }
            }
        }
    }
}

fn collect_uniforms(
    stage: ShaderStage,
    module: &naga::Module,
    table: &mut UniformTable,
    problems: &mut Vec<String>,
) {
    for (_, var) in module.global_variables.iter() {
        if var.space != AddressSpace::Uniform {
            continue;
        }
        let name = var.name.as_deref().unwrap_or("<anonymous>");

        let Some(rb) = &var.binding else {
            problems.push(format!("uniform `{name}` in the {stage} stage has no binding"));
            continue;
        };
        if rb.group != 0 {
            problems.push(format!(
                "uniform `{name}` in the {stage} stage uses set {}, only set 0 is supported",
                rb.group
            ));
            continue;
        }

        let inner = &module.types[var.ty].inner;
        table.add_block(rb.binding, inner.size(module.to_ctx()), stage, problems);

        match inner {
            TypeInner::Struct { members, .. } => {
                for m in members {
                    let Some(member) = m.name.as_deref() else { continue };
                    let slot = UniformSlot {
                        binding: rb.binding,
                        offset: m.offset,
                        kind: kind_of(&module.types[m.ty].inner),
                    };
                    table.insert(member, slot, problems);
                }
            }
            other => {
                let slot = UniformSlot {
                    binding: rb.binding,
                    offset: 0,
                    kind: kind_of(other),
                };
                table.insert(name, slot, problems);
            }
        }
    }
}

fn kind_of(inner: &TypeInner) -> UniformKind {
    match *inner {
        TypeInner::Matrix {
            columns: VectorSize::Quad,
            rows: VectorSize::Quad,
            scalar,
        } if scalar == naga::Scalar::F32 => UniformKind::Mat4,
        _ => UniformKind::Other,
    }
}

fn vector(size: VectorSize) -> TypeInner {
    TypeInner::Vector {
        size,
        scalar: naga::Scalar::F32,
    }
}

fn describe(inner: &TypeInner) -> String {
    let prefix = |kind: ScalarKind| match kind {
        ScalarKind::Sint => "i",
        ScalarKind::Uint => "u",
        ScalarKind::Bool => "b",
        _ => "",
    };
    match *inner {
        TypeInner::Scalar(s) => match s.kind {
            ScalarKind::Sint => "int".into(),
            ScalarKind::Uint => "uint".into(),
            ScalarKind::Bool => "bool".into(),
            _ => "float".into(),
        },
        TypeInner::Vector { size, scalar } => format!("{}vec{}", prefix(scalar.kind), size as u8),
        TypeInner::Matrix { columns, rows, .. } => format!("mat{}x{}", columns as u8, rows as u8),
        ref other => format!("{other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::shader::compile::compile_stage;
    use crate::render::shader::ShaderSource;

    const VS_HEADER: &str = "#version 450\n\
        layout(location = 0) in vec3 aPos;\n\
        layout(location = 1) in vec4 aColor;\n";

    fn shipped() -> (naga::Module, naga::Module) {
        let src = ShaderSource::parse(include_str!("../../../assets/shaders/default.glsl")).unwrap();
        (
            compile_stage(ShaderStage::Vertex, &src.vertex).unwrap(),
            compile_stage(ShaderStage::Fragment, &src.fragment).unwrap(),
        )
    }

    fn vs(body: &str) -> naga::Module {
        compile_stage(ShaderStage::Vertex, &format!("{VS_HEADER}{body}")).unwrap()
    }

    fn fs(body: &str) -> naga::Module {
        compile_stage(ShaderStage::Fragment, &format!("#version 450\n{body}")).unwrap()
    }

    #[test]
    fn shipped_program_reflects_camera_block() {
        let (v, f) = shipped();
        let table = link_interface(&v, &f).unwrap();

        let proj = table.get("uProjectionMatrix").unwrap();
        let view = table.get("uViewMatrix").unwrap();
        assert_eq!((proj.binding, proj.offset, proj.kind), (0, 0, UniformKind::Mat4));
        assert_eq!((view.binding, view.offset, view.kind), (0, 64, UniformKind::Mat4));

        assert_eq!(table.blocks().len(), 1);
        let block = table.blocks()[0];
        assert_eq!(block.size, 128);
        assert!(block.visibility.vertex && !block.visibility.fragment);
        assert!(table.get("uModel").is_none());
    }

    #[test]
    fn mismatched_varying_type_fails() {
        let (v, _) = shipped();
        let f = fs("layout(location = 0) in vec3 fColor;\n\
            layout(location = 0) out vec4 color;\n\
            void main() { color = vec4(fColor, 1.0); }\n");

        let problems = link_interface(&v, &f).unwrap_err();
        assert!(problems.iter().any(|p| p.contains("location 0")), "{problems:?}");
    }

    #[test]
    fn unwritten_varying_fails() {
        let (v, _) = shipped();
        let f = fs("layout(location = 0) in vec4 fColor;\n\
            layout(location = 3) in vec4 fExtra;\n\
            layout(location = 0) out vec4 color;\n\
            void main() { color = fColor + fExtra; }\n");

        let problems = link_interface(&v, &f).unwrap_err();
        assert_eq!(problems.len(), 1);
        assert!(problems[0].contains("location 3"));
    }

    #[test]
    fn vertex_inputs_must_match_layout() {
        let v = compile_stage(
            ShaderStage::Vertex,
            "#version 450\n\
            layout(location = 0) in vec2 aPos;\n\
            layout(location = 2) in vec4 aExtra;\n\
            void main() { gl_Position = vec4(aPos, 0.0, 1.0) + aExtra; }\n",
        )
        .unwrap();
        let f = fs("layout(location = 0) out vec4 color;\nvoid main() { color = vec4(1.0); }\n");

        let problems = link_interface(&v, &f).unwrap_err();
        assert_eq!(problems.len(), 2, "{problems:?}");
    }

    #[test]
    fn uniform_sets_other_than_zero_fail() {
        let v = vs("layout(set = 1, binding = 0) uniform Extra { mat4 uModel; };\n\
            void main() { gl_Position = uModel * vec4(aPos, 1.0); }\n");
        let f = fs("layout(location = 0) out vec4 color;\nvoid main() { color = vec4(1.0); }\n");

        let problems = link_interface(&v, &f).unwrap_err();
        assert!(problems[0].contains("set 1"));
    }

    #[test]
    fn shared_block_is_visible_to_both_stages() {
        let v = vs("layout(set = 0, binding = 0) uniform Params { mat4 uMvp; vec4 uTint; };\n\
            void main() { gl_Position = uMvp * vec4(aPos, 1.0); }\n");
        let f = fs("layout(set = 0, binding = 0) uniform Params { mat4 uMvp; vec4 uTint; };\n\
            layout(location = 0) out vec4 color;\n\
            void main() { color = uTint; }\n");

        let table = link_interface(&v, &f).unwrap();
        let block = table.blocks()[0];
        assert!(block.visibility.vertex && block.visibility.fragment);
        assert_eq!(table.get("uTint").unwrap().kind, UniformKind::Other);
        assert_eq!(table.get("uTint").unwrap().offset, 64);
    }
}
