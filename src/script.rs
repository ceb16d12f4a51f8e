use std::any::Any;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use rhai::{CallFnOptions, Dynamic, Engine, FuncArgs, Scope, AST, FLOAT};

use crate::entity::{Behavior, DrawCtx, UpdateCtx};
use crate::surface::{self, EngineApi};

/// Well-known entry point invoked once per update pass, with the frame's
/// delta time.
pub const UPDATE_ENTRY: &str = "update";
/// Well-known entry point invoked once per draw pass, with no arguments.
pub const RENDER_ENTRY: &str = "render";

/// Behaviour unit embedding one script interpreter.
///
/// Construction compiles and runs the script source and installs the engine
/// surface. Any load failure is reported once and leaves the bridge inert:
/// it stays attached, but its entry points are never invoked again. Runtime
/// errors inside an entry point are caught at the call site; the frame
/// continues.
pub struct ScriptBridge {
    engine: Engine,
    ast: Option<AST>,
    scope: Scope<'static>,
    script_path: PathBuf,
    error: Option<String>,
    has_update: bool,
    has_render: bool,
}

impl ScriptBridge {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let mut engine = Engine::new();
        engine.set_fast_operators(true);
        surface::register_api(&mut engine);
        engine.register_global_module(surface::constants_module().into());
        let mut bridge = Self {
            engine,
            ast: None,
            scope: Scope::new(),
            script_path: path.as_ref().to_path_buf(),
            error: None,
            has_update: false,
            has_render: false,
        };
        if let Err(err) = bridge.load() {
            eprintln!("[script] {}: {err:#}", bridge.script_path.display());
            bridge.error = Some(format!("{err:#}"));
            bridge.ast = None;
        }
        bridge
    }

    pub fn loaded(&self) -> bool {
        self.ast.is_some()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn script_path(&self) -> &Path {
        &self.script_path
    }

    pub fn has_update_entry(&self) -> bool {
        self.has_update
    }

    pub fn has_render_entry(&self) -> bool {
        self.has_render
    }

    fn load(&mut self) -> Result<()> {
        let source = fs::read_to_string(&self.script_path)
            .with_context(|| format!("Reading {}", self.script_path.display()))?;
        let ast = self.engine.compile(source).map_err(|err| anyhow::anyhow!("compile error: {err}"))?;
        self.has_update = ast.iter_functions().any(|f| f.name == UPDATE_ENTRY);
        self.has_render = ast.iter_functions().any(|f| f.name == RENDER_ENTRY);
        // Top-level statements run once, here.
        self.engine
            .run_ast_with_scope(&mut self.scope, &ast)
            .map_err(|err| anyhow::anyhow!("script error: {err}"))?;
        self.ast = Some(ast);
        Ok(())
    }

    fn call_entry(&mut self, name: &str, args: impl FuncArgs) {
        let Some(ast) = &self.ast else { return };
        // Top-level already ran at load; keep whatever state it left in the
        // scope across calls.
        let options = CallFnOptions::new().eval_ast(false).rewind_scope(false);
        match self.engine.call_fn_with_options::<Dynamic>(options, &mut self.scope, ast, name, args) {
            Ok(_) => {
                self.error = None;
            }
            Err(err) => {
                let message = err.to_string();
                // Only report a failure once, not every frame it repeats.
                if self.error.as_deref() != Some(message.as_str()) {
                    eprintln!("[script] {} in {}: {message}", name, self.script_path.display());
                }
                self.error = Some(message);
            }
        }
    }
}

impl Behavior for ScriptBridge {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn update(&mut self, ctx: &mut UpdateCtx<'_>) {
        if self.ast.is_none() || !self.has_update {
            return;
        }
        let api = EngineApi::from_update(ctx);
        let dt = ctx.dt as FLOAT;
        self.call_entry(UPDATE_ENTRY, (api, dt));
    }

    fn draw(&mut self, ctx: &mut DrawCtx<'_>) {
        if self.ast.is_none() {
            return;
        }
        let api = EngineApi::from_draw(ctx);
        if self.has_render {
            self.call_entry(RENDER_ENTRY, (api,));
        } else if self.has_update {
            // Scripts without a render hook still get one callback during
            // the draw phase: their update entry, with a zero delta time.
            // Note that such a script's update logic runs twice per frame.
            self.call_entry(UPDATE_ENTRY, (api, 0.0 as FLOAT));
        }
    }
}
