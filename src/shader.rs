use crate::gl::{GraphicsApi, ShaderStage};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShaderError {
    /// The driver handed out no shader or program object.
    Create(String),
    Compile { stage: ShaderStage, log: String },
    Link { log: String },
}
impl core::fmt::Display for ShaderError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ShaderError::Create(e) => write!(f, "failed to create shader object: {e}"),
            ShaderError::Compile { stage, log } => {
                write!(f, "failed to compile {stage} shader: {log}")
            }
            ShaderError::Link { log } => write!(f, "failed to link program: {log}"),
        }
    }
}
impl std::error::Error for ShaderError {}

/// A linked program and whatever the driver complained about while building it.
///
/// Compile and link failures do not stop the build; they are logged and kept in
/// [`ShaderProgram::diagnostics`]. The program handle is valid either way, though
/// drawing with an unlinked program produces driver-defined output.
#[derive(Debug)]
pub struct ShaderProgram<G: GraphicsApi> {
    program: G::Program,
    diagnostics: Vec<ShaderError>,
}
impl<G: GraphicsApi> ShaderProgram<G> {
    pub fn new(gl: &G, vertex: &str, fragment: &str) -> Result<Self, ShaderError> {
        let mut diagnostics = vec![];
        let vs = compile(gl, ShaderStage::Vertex, vertex, &mut diagnostics)?;
        let fs = compile(gl, ShaderStage::Fragment, fragment, &mut diagnostics)?;

        let program = gl.create_program().map_err(ShaderError::Create)?;
        gl.attach_shader(program, vs);
        gl.attach_shader(program, fs);
        gl.link_program(program);
        if !gl.program_link_status(program) {
            let log = gl.program_info_log(program);
            tracing::error!("failed to link program: {log}");
            diagnostics.push(ShaderError::Link { log });
        }

        gl.delete_shader(vs);
        gl.delete_shader(fs);
        Ok(Self {
            program,
            diagnostics,
        })
    }

    pub fn diagnostics(&self) -> &[ShaderError] {
        &self.diagnostics
    }

    pub fn is_linked(&self) -> bool {
        !self
            .diagnostics
            .iter()
            .any(|e| matches!(e, ShaderError::Link { .. }))
    }

    /// Fails with the first diagnostic, if any.
    pub fn strict(self) -> Result<Self, ShaderError> {
        match self.diagnostics.first() {
            Some(e) => Err(e.clone()),
            None => Ok(self),
        }
    }

    pub fn bind(&self, gl: &G) {
        gl.use_program(Some(self.program));
    }

    pub fn delete(self, gl: &G) {
        gl.delete_program(self.program);
    }
}

fn compile<G: GraphicsApi>(
    gl: &G,
    stage: ShaderStage,
    source: &str,
    diagnostics: &mut Vec<ShaderError>,
) -> Result<G::Shader, ShaderError> {
    let shader = gl.create_shader(stage).map_err(ShaderError::Create)?;
    gl.shader_source(shader, source);
    gl.compile_shader(shader);
    if !gl.shader_compile_status(shader) {
        let log = gl.shader_info_log(shader);
        tracing::error!(%stage, "failed to compile shader: {log}");
        diagnostics.push(ShaderError::Compile { stage, log });
    }
    Ok(shader)
}

#[cfg(test)]
mod tests {
    use crate::gl::recording::{Call, RecordingGl};

    use super::*;

    const VS: &str = "#version 330 core\nvoid main() {}\n";
    const FS: &str = "#version 330 core\nout vec4 c;\nvoid main() { c = vec4(1.0); }\n";

    #[test]
    fn test_compile_and_link() {
        let gl = RecordingGl::new();
        let program = ShaderProgram::new(&gl, VS, FS).unwrap();
        assert!(program.diagnostics().is_empty());
        assert!(program.is_linked());
        assert!(program.strict().is_ok());
    }

    #[test]
    fn test_stages_released_after_link() {
        let gl = RecordingGl::new();
        let _program = ShaderProgram::new(&gl, VS, FS).unwrap();
        let calls = gl.calls();
        let link = calls
            .iter()
            .position(|c| matches!(c, Call::LinkProgram(_)))
            .unwrap();
        let deletes: Vec<_> = calls
            .iter()
            .enumerate()
            .filter(|(_, c)| matches!(c, Call::DeleteShader(_)))
            .map(|(i, _)| i)
            .collect();
        assert_eq!(deletes.len(), 2);
        assert!(deletes.iter().all(|&i| i > link));
    }

    #[test]
    fn test_compile_failure_continues() {
        let gl = RecordingGl::new();
        let program = ShaderProgram::new(&gl, "void main() {}", FS).unwrap();
        let diagnostics = program.diagnostics();
        assert_eq!(diagnostics.len(), 2);
        assert!(matches!(
            &diagnostics[0],
            ShaderError::Compile {
                stage: ShaderStage::Vertex,
                log,
            } if !log.is_empty()
        ));
        assert!(matches!(diagnostics[1], ShaderError::Link { .. }));
        assert!(!program.is_linked());
        assert!(gl.calls().contains(&Call::LinkProgram(3)));
    }

    #[test]
    fn test_strict_escalates_first_diagnostic() {
        let gl = RecordingGl::new();
        let program = ShaderProgram::new(&gl, VS, "out vec4 c;").unwrap();
        let err = program.strict().unwrap_err();
        assert!(matches!(
            err,
            ShaderError::Compile {
                stage: ShaderStage::Fragment,
                ..
            }
        ));
        assert!(err.to_string().starts_with("failed to compile fragment shader"));
    }
}
