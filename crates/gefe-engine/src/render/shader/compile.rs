use wgpu::naga;

use super::source::ShaderStage;

/// Compiles one GLSL stage into validated naga IR.
///
/// On failure returns the human-readable diagnostic log, rendered against
/// `source` so it carries line/column context.
pub(crate) fn compile_stage(stage: ShaderStage, source: &str) -> Result<naga::Module, String> {
    let options = naga::front::glsl::Options::from(stage.to_naga());
    let module = naga::front::glsl::Frontend::default()
        .parse(&options, source)
        .map_err(|e| e.emit_to_string(source))?;

    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::empty(),
    );
    validator
        .validate(&module)
        .map_err(|e| e.emit_to_string(source))?;

    Ok(module)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::shader::ShaderSource;

    fn shipped() -> ShaderSource {
        ShaderSource::parse(include_str!("../../../assets/shaders/default.glsl")).unwrap()
    }

    #[test]
    fn shipped_stages_compile() {
        let src = shipped();
        let vs = compile_stage(ShaderStage::Vertex, &src.vertex).unwrap();
        let fs = compile_stage(ShaderStage::Fragment, &src.fragment).unwrap();

        assert_eq!(vs.entry_points.len(), 1);
        assert_eq!(vs.entry_points[0].stage, naga::ShaderStage::Vertex);
        assert_eq!(fs.entry_points[0].stage, naga::ShaderStage::Fragment);
    }

    #[test]
    fn syntax_error_yields_log() {
        let broken = "#version 450\nvoid main() { gl_Position = vec4(0.0) }\n";
        let log = compile_stage(ShaderStage::Vertex, broken).unwrap_err();
        assert!(!log.is_empty());
    }

    #[test]
    fn undeclared_identifier_yields_log() {
        let broken = "#version 450\nlayout(location = 0) out vec4 color;\nvoid main() { color = missing; }\n";
        let log = compile_stage(ShaderStage::Fragment, broken).unwrap_err();
        assert!(log.contains("missing"), "log was: {log}");
    }
}
