//! The fixed, enumerable set of host operations and constants exposed to
//! embedded scripts, plus the value conversions at that boundary.
//!
//! Every value crossing the boundary goes through an explicit conversion
//! pair (`*_to_array` / `*_from_array`); malformed arguments fail the
//! embedded call with a script-level error, never the host.

use glam::{Vec2, Vec3};
use rand::Rng;
use rhai::{Array, Dynamic, Engine, EvalAltResult, Module, Position, FLOAT, INT};

use crate::audio::AudioManager;
use crate::camera::Camera2D;
use crate::camera3d::{Camera3D, CameraMode, Projection};
use crate::color::{self, Color};
use crate::entity::{DrawCtx, UpdateCtx};
use crate::input::{self, Input};
use crate::renderer::{Rect, Renderer, TextureInfo};
use crate::time::FrameClock;
use crate::window::WindowCtl;

type ScriptResult<T> = Result<T, Box<EvalAltResult>>;

pub const CAMERA_TABLE: &[(&str, INT)] = &[
    ("CAMERA_CUSTOM", 0),
    ("CAMERA_FREE", 1),
    ("CAMERA_ORBITAL", 2),
    ("CAMERA_FIRST_PERSON", 3),
    ("CAMERA_THIRD_PERSON", 4),
    ("CAMERA_PERSPECTIVE", 0),
    ("CAMERA_ORTHOGRAPHIC", 1),
];

// --- boundary conversions -------------------------------------------------

fn mismatch(expected: &str, got: &Dynamic) -> Box<EvalAltResult> {
    EvalAltResult::ErrorMismatchDataType(expected.into(), got.type_name().into(), Position::NONE).into()
}

fn runtime_err(err: anyhow::Error) -> Box<EvalAltResult> {
    EvalAltResult::ErrorRuntime(err.to_string().into(), Position::NONE).into()
}

/// Accepts ints where scripts pass whole numbers into float slots.
pub fn number(value: &Dynamic) -> ScriptResult<f32> {
    value
        .as_float()
        .map(|f| f as f32)
        .or_else(|_| value.as_int().map(|i| i as f32))
        .map_err(|_| mismatch("number", value))
}

pub fn integer(value: &Dynamic) -> ScriptResult<INT> {
    value.as_int().map_err(|_| mismatch("integer", value))
}

pub fn color_to_array(color: Color) -> Array {
    vec![
        Dynamic::from_int(color.r as INT),
        Dynamic::from_int(color.g as INT),
        Dynamic::from_int(color.b as INT),
        Dynamic::from_int(color.a as INT),
    ]
}

/// Channels 1..4 as ints. A zero or omitted alpha means fully opaque; that
/// substitution happens on this input path only.
pub fn color_from_array(values: &Array) -> ScriptResult<Color> {
    if values.len() < 3 {
        return Err(mismatch("color array [r, g, b, a]", &Dynamic::from(values.clone())));
    }
    let channel = |index: usize| -> ScriptResult<u8> {
        match values.get(index) {
            Some(value) => integer(value).map(|v| v as u8),
            None => Ok(0),
        }
    };
    let alpha = channel(3)?;
    Ok(Color {
        r: channel(0)?,
        g: channel(1)?,
        b: channel(2)?,
        a: if alpha == 0 { 255 } else { alpha },
    })
}

pub fn vec2_to_array(v: Vec2) -> Array {
    vec![Dynamic::from_float(v.x as FLOAT), Dynamic::from_float(v.y as FLOAT)]
}

pub fn vec2_from_array(values: &Array) -> ScriptResult<Vec2> {
    if values.len() < 2 {
        return Err(mismatch("vector array [x, y]", &Dynamic::from(values.clone())));
    }
    Ok(Vec2::new(number(&values[0])?, number(&values[1])?))
}

pub fn vec3_to_array(v: Vec3) -> Array {
    vec![
        Dynamic::from_float(v.x as FLOAT),
        Dynamic::from_float(v.y as FLOAT),
        Dynamic::from_float(v.z as FLOAT),
    ]
}

pub fn vec3_from_array(values: &Array) -> ScriptResult<Vec3> {
    if values.len() < 3 {
        return Err(mismatch("vector array [x, y, z]", &Dynamic::from(values.clone())));
    }
    Ok(Vec3::new(number(&values[0])?, number(&values[1])?, number(&values[2])?))
}

pub fn rect_from_array(values: &Array) -> ScriptResult<Rect> {
    if values.len() < 4 {
        return Err(mismatch("rectangle array [x, y, width, height]", &Dynamic::from(values.clone())));
    }
    Ok(Rect::new(number(&values[0])?, number(&values[1])?, number(&values[2])?, number(&values[3])?))
}

pub fn texture_to_array(info: TextureInfo) -> Array {
    vec![
        Dynamic::from_int(info.id as INT),
        Dynamic::from_int(info.width as INT),
        Dynamic::from_int(info.height as INT),
        Dynamic::from_int(info.mipmaps as INT),
        Dynamic::from_int(info.format as INT),
    ]
}

/// The flat five-field texture tuple. Scripts must pass back exactly what
/// `load_texture` returned; the boundary cannot carry live handles.
pub fn texture_from_array(values: &Array) -> ScriptResult<TextureInfo> {
    if values.len() < 5 {
        return Err(mismatch(
            "texture array [id, width, height, mipmaps, format]",
            &Dynamic::from(values.clone()),
        ));
    }
    Ok(TextureInfo {
        id: integer(&values[0])? as u32,
        width: integer(&values[1])? as u32,
        height: integer(&values[2])? as u32,
        mipmaps: integer(&values[3])? as u32,
        format: integer(&values[4])? as u32,
    })
}

/// Key codes, mouse buttons, camera codes and the color palette, built once
/// per bridge and registered into the interpreter's global namespace.
pub fn constants_module() -> Module {
    let mut module = Module::new();
    for (name, code) in input::KEY_TABLE {
        module.set_var(*name, *code);
    }
    for (name, code) in input::MOUSE_TABLE {
        module.set_var(*name, *code);
    }
    for (name, code) in CAMERA_TABLE {
        module.set_var(*name, *code);
    }
    for (name, color) in color::PALETTE {
        module.set_var(*name, color_to_array(*color));
    }
    module
}

// --- the api object -------------------------------------------------------

/// Host handle passed as the first argument of every script entry point.
///
/// Raw pointers to the engine services, rebuilt for each invocation and
/// valid only for its duration; the host never stores one across calls.
#[derive(Clone, Copy)]
pub struct EngineApi {
    gfx: *mut Renderer,
    input: *mut Input,
    clock: *const FrameClock,
    audio: *mut AudioManager,
    window: *mut WindowCtl,
}

unsafe impl Send for EngineApi {}
unsafe impl Sync for EngineApi {}

impl EngineApi {
    pub(crate) fn new(
        gfx: &mut Renderer,
        input: &mut Input,
        clock: &FrameClock,
        audio: &mut AudioManager,
        window: &mut WindowCtl,
    ) -> Self {
        Self { gfx, input, clock, audio, window }
    }

    pub(crate) fn from_update(ctx: &mut UpdateCtx<'_>) -> Self {
        Self::new(ctx.gfx, ctx.input, ctx.clock, ctx.audio, ctx.window)
    }

    pub(crate) fn from_draw(ctx: &mut DrawCtx<'_>) -> Self {
        Self::new(ctx.gfx, ctx.input, ctx.clock, ctx.audio, ctx.window)
    }

    fn gfx(&mut self) -> &mut Renderer {
        unsafe { &mut *self.gfx }
    }

    fn input(&self) -> &Input {
        unsafe { &*self.input }
    }

    fn input_mut(&mut self) -> &mut Input {
        unsafe { &mut *self.input }
    }

    fn clock(&self) -> &FrameClock {
        unsafe { &*self.clock }
    }

    fn audio(&mut self) -> &mut AudioManager {
        unsafe { &mut *self.audio }
    }

    fn window(&mut self) -> &mut WindowCtl {
        unsafe { &mut *self.window }
    }

    // window and frame lifecycle

    fn window_should_close(&mut self) -> bool {
        self.window().should_close
    }

    fn request_close(&mut self) {
        self.window().request_close();
    }

    fn set_target_fps(&mut self, fps: Dynamic) -> ScriptResult<()> {
        let fps = integer(&fps)?.max(0) as u32;
        self.window().set_target_fps(fps);
        Ok(())
    }

    fn begin_drawing(&mut self) -> ScriptResult<()> {
        self.gfx().begin_frame().map_err(runtime_err)
    }

    fn end_drawing(&mut self) -> ScriptResult<()> {
        self.gfx().end_frame(None).map_err(runtime_err)
    }

    fn clear_background(&mut self, color: Array) -> ScriptResult<()> {
        let color = color_from_array(&color)?;
        self.gfx().clear_background(color).map_err(runtime_err)
    }

    // 2D primitives

    fn draw_text(&mut self, text: &str, x: Dynamic, y: Dynamic, font_size: Dynamic, color: Array) -> ScriptResult<()> {
        let color = color_from_array(&color)?;
        self.gfx()
            .draw_text(text, number(&x)?, number(&y)?, number(&font_size)?, color)
            .map_err(runtime_err)
    }

    fn draw_rectangle(&mut self, x: Dynamic, y: Dynamic, w: Dynamic, h: Dynamic, color: Array) -> ScriptResult<()> {
        let color = color_from_array(&color)?;
        self.gfx()
            .draw_rectangle(number(&x)?, number(&y)?, number(&w)?, number(&h)?, color)
            .map_err(runtime_err)
    }

    fn draw_rectangle_lines(&mut self, x: Dynamic, y: Dynamic, w: Dynamic, h: Dynamic, color: Array) -> ScriptResult<()> {
        let color = color_from_array(&color)?;
        self.gfx()
            .draw_rectangle_lines(number(&x)?, number(&y)?, number(&w)?, number(&h)?, color)
            .map_err(runtime_err)
    }

    fn draw_circle(&mut self, cx: Dynamic, cy: Dynamic, radius: Dynamic, color: Array) -> ScriptResult<()> {
        let color = color_from_array(&color)?;
        self.gfx().draw_circle(number(&cx)?, number(&cy)?, number(&radius)?, color).map_err(runtime_err)
    }

    fn draw_circle_lines(&mut self, cx: Dynamic, cy: Dynamic, radius: Dynamic, color: Array) -> ScriptResult<()> {
        let color = color_from_array(&color)?;
        self.gfx()
            .draw_circle_lines(number(&cx)?, number(&cy)?, number(&radius)?, color)
            .map_err(runtime_err)
    }

    fn draw_line(&mut self, x1: Dynamic, y1: Dynamic, x2: Dynamic, y2: Dynamic, color: Array) -> ScriptResult<()> {
        let color = color_from_array(&color)?;
        self.gfx()
            .draw_line(number(&x1)?, number(&y1)?, number(&x2)?, number(&y2)?, color)
            .map_err(runtime_err)
    }

    fn draw_pixel(&mut self, x: Dynamic, y: Dynamic, color: Array) -> ScriptResult<()> {
        let color = color_from_array(&color)?;
        self.gfx().draw_pixel(number(&x)?, number(&y)?, color).map_err(runtime_err)
    }

    // 3D primitives

    fn draw_cube(&mut self, position: Array, w: Dynamic, h: Dynamic, l: Dynamic, color: Array) -> ScriptResult<()> {
        let position = vec3_from_array(&position)?;
        let color = color_from_array(&color)?;
        self.gfx()
            .draw_cube(position, number(&w)?, number(&h)?, number(&l)?, color)
            .map_err(runtime_err)
    }

    fn draw_cube_wires(&mut self, position: Array, w: Dynamic, h: Dynamic, l: Dynamic, color: Array) -> ScriptResult<()> {
        let position = vec3_from_array(&position)?;
        let color = color_from_array(&color)?;
        self.gfx()
            .draw_cube_wires(position, number(&w)?, number(&h)?, number(&l)?, color)
            .map_err(runtime_err)
    }

    fn draw_sphere(&mut self, center: Array, radius: Dynamic, color: Array) -> ScriptResult<()> {
        let center = vec3_from_array(&center)?;
        let color = color_from_array(&color)?;
        self.gfx().draw_sphere(center, number(&radius)?, color).map_err(runtime_err)
    }

    fn draw_sphere_wires(
        &mut self,
        center: Array,
        radius: Dynamic,
        rings: Dynamic,
        slices: Dynamic,
        color: Array,
    ) -> ScriptResult<()> {
        let center = vec3_from_array(&center)?;
        let color = color_from_array(&color)?;
        self.gfx()
            .draw_sphere_wires(
                center,
                number(&radius)?,
                integer(&rings)?.max(2) as u32,
                integer(&slices)?.max(3) as u32,
                color,
            )
            .map_err(runtime_err)
    }

    fn draw_grid(&mut self, slices: Dynamic, spacing: Dynamic) -> ScriptResult<()> {
        self.gfx().draw_grid(integer(&slices)? as i32, number(&spacing)?).map_err(runtime_err)
    }

    // camera scopes

    fn begin_mode_3d(
        &mut self,
        position: Array,
        target: Array,
        up: Array,
        fovy: Dynamic,
        projection: Dynamic,
    ) -> ScriptResult<()> {
        let camera = Camera3D::new(
            vec3_from_array(&position)?,
            vec3_from_array(&target)?,
            vec3_from_array(&up)?,
            number(&fovy)?,
            Projection::from_code(integer(&projection)?),
        );
        self.gfx().begin_mode_3d(&camera).map_err(runtime_err)
    }

    fn end_mode_3d(&mut self) -> ScriptResult<()> {
        self.gfx().end_mode_3d().map_err(runtime_err)
    }

    fn begin_mode_2d(&mut self, offset: Array, target: Array, rotation: Dynamic, zoom: Dynamic) -> ScriptResult<()> {
        let camera = Camera2D::new(
            vec2_from_array(&offset)?,
            vec2_from_array(&target)?,
            number(&rotation)?,
            number(&zoom)?,
        );
        self.gfx().begin_mode_2d(&camera).map_err(runtime_err)
    }

    fn end_mode_2d(&mut self) -> ScriptResult<()> {
        self.gfx().end_mode_2d().map_err(runtime_err)
    }

    /// Runs one step of the built-in camera controller and hands the whole
    /// mutated camera state back: `[position, target, up, fovy, projection]`.
    fn update_camera(
        &mut self,
        position: Array,
        target: Array,
        up: Array,
        fovy: Dynamic,
        projection: Dynamic,
        mode: Dynamic,
    ) -> ScriptResult<Array> {
        let mut camera = Camera3D::new(
            vec3_from_array(&position)?,
            vec3_from_array(&target)?,
            vec3_from_array(&up)?,
            number(&fovy)?,
            Projection::from_code(integer(&projection)?),
        );
        let mode = CameraMode::from_code(integer(&mode)?);
        let dt = self.clock().delta_seconds();
        camera.update(mode, dt, self.input());
        Ok(vec![
            Dynamic::from(vec3_to_array(camera.position)),
            Dynamic::from(vec3_to_array(camera.target)),
            Dynamic::from(vec3_to_array(camera.up)),
            Dynamic::from_float(camera.fov_y_degrees as FLOAT),
            Dynamic::from_int(camera.projection.code()),
        ])
    }

    // input polling

    fn is_key_down(&mut self, key: Dynamic) -> ScriptResult<bool> {
        Ok(self.input().is_key_down(integer(&key)?))
    }

    fn is_key_pressed(&mut self, key: Dynamic) -> ScriptResult<bool> {
        Ok(self.input().is_key_pressed(integer(&key)?))
    }

    fn is_key_released(&mut self, key: Dynamic) -> ScriptResult<bool> {
        Ok(self.input().is_key_released(integer(&key)?))
    }

    fn is_key_up(&mut self, key: Dynamic) -> ScriptResult<bool> {
        Ok(self.input().is_key_up(integer(&key)?))
    }

    fn get_key_pressed(&mut self) -> INT {
        self.input_mut().pop_key()
    }

    fn get_char_pressed(&mut self) -> INT {
        self.input_mut().pop_char()
    }

    fn get_mouse_x(&mut self) -> INT {
        self.input().cursor_pos().0 as INT
    }

    fn get_mouse_y(&mut self) -> INT {
        self.input().cursor_pos().1 as INT
    }

    fn get_mouse_position(&mut self) -> Array {
        let (x, y) = self.input().cursor_pos();
        vec2_to_array(Vec2::new(x, y))
    }

    fn get_mouse_delta(&mut self) -> Array {
        let (dx, dy) = self.input().mouse_delta;
        vec2_to_array(Vec2::new(dx, dy))
    }

    fn get_mouse_wheel_move(&mut self) -> FLOAT {
        self.input().wheel_move() as FLOAT
    }

    fn is_mouse_button_down(&mut self, button: Dynamic) -> ScriptResult<bool> {
        Ok(self.input().is_mouse_button_down(integer(&button)?))
    }

    fn is_mouse_button_pressed(&mut self, button: Dynamic) -> ScriptResult<bool> {
        Ok(self.input().is_mouse_button_pressed(integer(&button)?))
    }

    fn is_mouse_button_released(&mut self, button: Dynamic) -> ScriptResult<bool> {
        Ok(self.input().is_mouse_button_released(integer(&button)?))
    }

    fn is_mouse_button_up(&mut self, button: Dynamic) -> ScriptResult<bool> {
        Ok(self.input().is_mouse_button_up(integer(&button)?))
    }

    // timing

    fn get_frame_time(&mut self) -> FLOAT {
        self.clock().delta_seconds() as FLOAT
    }

    fn get_time(&mut self) -> FLOAT {
        self.clock().elapsed_seconds() as FLOAT
    }

    fn get_fps(&mut self) -> INT {
        self.clock().fps() as INT
    }

    // vector math

    fn vec2_add(&mut self, a: Array, b: Array) -> ScriptResult<Array> {
        Ok(vec2_to_array(vec2_from_array(&a)? + vec2_from_array(&b)?))
    }

    fn vec2_subtract(&mut self, a: Array, b: Array) -> ScriptResult<Array> {
        Ok(vec2_to_array(vec2_from_array(&a)? - vec2_from_array(&b)?))
    }

    fn vec2_scale(&mut self, v: Array, scale: Dynamic) -> ScriptResult<Array> {
        Ok(vec2_to_array(vec2_from_array(&v)? * number(&scale)?))
    }

    fn vec2_length(&mut self, v: Array) -> ScriptResult<FLOAT> {
        Ok(vec2_from_array(&v)?.length() as FLOAT)
    }

    fn vec2_distance(&mut self, a: Array, b: Array) -> ScriptResult<FLOAT> {
        Ok(vec2_from_array(&a)?.distance(vec2_from_array(&b)?) as FLOAT)
    }

    fn vec2_dot_product(&mut self, a: Array, b: Array) -> ScriptResult<FLOAT> {
        Ok(vec2_from_array(&a)?.dot(vec2_from_array(&b)?) as FLOAT)
    }

    fn vec2_angle(&mut self, a: Array, b: Array) -> ScriptResult<FLOAT> {
        let a = vec2_from_array(&a)?;
        let b = vec2_from_array(&b)?;
        Ok((b.y - a.y).atan2(b.x - a.x) as FLOAT)
    }

    fn vec2_normalize(&mut self, v: Array) -> ScriptResult<Array> {
        Ok(vec2_to_array(vec2_from_array(&v)?.normalize_or_zero()))
    }

    fn vec2_rotate(&mut self, v: Array, angle: Dynamic) -> ScriptResult<Array> {
        let v = vec2_from_array(&v)?;
        Ok(vec2_to_array(Vec2::from_angle(number(&angle)?).rotate(v)))
    }

    fn vec3_add(&mut self, a: Array, b: Array) -> ScriptResult<Array> {
        Ok(vec3_to_array(vec3_from_array(&a)? + vec3_from_array(&b)?))
    }

    fn vec3_subtract(&mut self, a: Array, b: Array) -> ScriptResult<Array> {
        Ok(vec3_to_array(vec3_from_array(&a)? - vec3_from_array(&b)?))
    }

    fn vec3_scale(&mut self, v: Array, scale: Dynamic) -> ScriptResult<Array> {
        Ok(vec3_to_array(vec3_from_array(&v)? * number(&scale)?))
    }

    fn vec3_length(&mut self, v: Array) -> ScriptResult<FLOAT> {
        Ok(vec3_from_array(&v)?.length() as FLOAT)
    }

    fn vec3_cross_product(&mut self, a: Array, b: Array) -> ScriptResult<Array> {
        Ok(vec3_to_array(vec3_from_array(&a)?.cross(vec3_from_array(&b)?)))
    }

    fn vec3_normalize(&mut self, v: Array) -> ScriptResult<Array> {
        Ok(vec3_to_array(vec3_from_array(&v)?.normalize_or_zero()))
    }

    // color math

    fn color_from_hsv(&mut self, hue: Dynamic, saturation: Dynamic, value: Dynamic) -> ScriptResult<Array> {
        Ok(color_to_array(Color::from_hsv(number(&hue)?, number(&saturation)?, number(&value)?)))
    }

    fn color_alpha(&mut self, color: Array, alpha: Dynamic) -> ScriptResult<Array> {
        Ok(color_to_array(color_from_array(&color)?.with_alpha(number(&alpha)?)))
    }

    fn color_alpha_blend(&mut self, dst: Array, src: Array, tint: Array) -> ScriptResult<Array> {
        Ok(color_to_array(Color::alpha_blend(
            color_from_array(&dst)?,
            color_from_array(&src)?,
            color_from_array(&tint)?,
        )))
    }

    // resources

    fn load_texture(&mut self, path: &str) -> ScriptResult<Array> {
        self.gfx().load_texture(path).map(texture_to_array).map_err(runtime_err)
    }

    fn unload_texture(&mut self, texture: Array) -> ScriptResult<()> {
        let info = texture_from_array(&texture)?;
        self.gfx().unload_texture(info.id);
        Ok(())
    }

    fn draw_texture(&mut self, texture: Array, x: Dynamic, y: Dynamic, tint: Array) -> ScriptResult<()> {
        let info = texture_from_array(&texture)?;
        let tint = color_from_array(&tint)?;
        self.gfx().draw_texture(&info, number(&x)?, number(&y)?, tint).map_err(runtime_err)
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_texture_pro(
        &mut self,
        texture: Array,
        source: Array,
        dest: Array,
        origin: Array,
        rotation: Dynamic,
        tint: Array,
    ) -> ScriptResult<()> {
        let info = texture_from_array(&texture)?;
        let source = rect_from_array(&source)?;
        let dest = rect_from_array(&dest)?;
        let origin = vec2_from_array(&origin)?;
        let tint = color_from_array(&tint)?;
        self.gfx()
            .draw_texture_pro(&info, source, dest, origin, number(&rotation)?, tint)
            .map_err(runtime_err)
    }

    fn load_sound(&mut self, path: &str) -> ScriptResult<INT> {
        self.audio().load_sound(path).map_err(runtime_err)
    }

    fn play_sound(&mut self, sound: Dynamic) -> ScriptResult<()> {
        let id = integer(&sound)?;
        self.audio().play_sound(id).map_err(runtime_err)
    }

    // misc

    fn get_random_value(&mut self, min: Dynamic, max: Dynamic) -> ScriptResult<INT> {
        let mut min = integer(&min)?;
        let mut max = integer(&max)?;
        if min > max {
            std::mem::swap(&mut min, &mut max);
        }
        Ok(rand::thread_rng().gen_range(min..=max))
    }

    fn clamp(&mut self, value: Dynamic, min: Dynamic, max: Dynamic) -> ScriptResult<FLOAT> {
        let (value, min, max) = (number(&value)?, number(&min)?, number(&max)?);
        Ok(value.clamp(min, max.max(min)) as FLOAT)
    }

    fn log(&mut self, message: &str) {
        println!("[script] {message}");
    }
}

/// Registers the whole operation table on the interpreter. Scripts call
/// these as methods on the api handle they receive.
pub fn register_api(engine: &mut Engine) {
    engine.register_type_with_name::<EngineApi>("Engine");

    engine.register_fn("window_should_close", EngineApi::window_should_close);
    engine.register_fn("request_close", EngineApi::request_close);
    engine.register_fn("set_target_fps", EngineApi::set_target_fps);
    engine.register_fn("begin_drawing", EngineApi::begin_drawing);
    engine.register_fn("end_drawing", EngineApi::end_drawing);
    engine.register_fn("clear_background", EngineApi::clear_background);

    engine.register_fn("draw_text", EngineApi::draw_text);
    engine.register_fn("draw_rectangle", EngineApi::draw_rectangle);
    engine.register_fn("draw_rectangle_lines", EngineApi::draw_rectangle_lines);
    engine.register_fn("draw_circle", EngineApi::draw_circle);
    engine.register_fn("draw_circle_lines", EngineApi::draw_circle_lines);
    engine.register_fn("draw_line", EngineApi::draw_line);
    engine.register_fn("draw_pixel", EngineApi::draw_pixel);

    engine.register_fn("draw_cube", EngineApi::draw_cube);
    engine.register_fn("draw_cube_wires", EngineApi::draw_cube_wires);
    engine.register_fn("draw_sphere", EngineApi::draw_sphere);
    engine.register_fn("draw_sphere_wires", EngineApi::draw_sphere_wires);
    engine.register_fn("draw_grid", EngineApi::draw_grid);

    engine.register_fn("begin_mode_3d", EngineApi::begin_mode_3d);
    engine.register_fn("end_mode_3d", EngineApi::end_mode_3d);
    engine.register_fn("begin_mode_2d", EngineApi::begin_mode_2d);
    engine.register_fn("end_mode_2d", EngineApi::end_mode_2d);
    engine.register_fn("update_camera", EngineApi::update_camera);

    engine.register_fn("is_key_down", EngineApi::is_key_down);
    engine.register_fn("is_key_pressed", EngineApi::is_key_pressed);
    engine.register_fn("is_key_released", EngineApi::is_key_released);
    engine.register_fn("is_key_up", EngineApi::is_key_up);
    engine.register_fn("get_key_pressed", EngineApi::get_key_pressed);
    engine.register_fn("get_char_pressed", EngineApi::get_char_pressed);

    engine.register_fn("get_mouse_x", EngineApi::get_mouse_x);
    engine.register_fn("get_mouse_y", EngineApi::get_mouse_y);
    engine.register_fn("get_mouse_position", EngineApi::get_mouse_position);
    engine.register_fn("get_mouse_delta", EngineApi::get_mouse_delta);
    engine.register_fn("get_mouse_wheel_move", EngineApi::get_mouse_wheel_move);
    engine.register_fn("is_mouse_button_down", EngineApi::is_mouse_button_down);
    engine.register_fn("is_mouse_button_pressed", EngineApi::is_mouse_button_pressed);
    engine.register_fn("is_mouse_button_released", EngineApi::is_mouse_button_released);
    engine.register_fn("is_mouse_button_up", EngineApi::is_mouse_button_up);

    engine.register_fn("get_frame_time", EngineApi::get_frame_time);
    engine.register_fn("get_time", EngineApi::get_time);
    engine.register_fn("get_fps", EngineApi::get_fps);

    engine.register_fn("vec2_add", EngineApi::vec2_add);
    engine.register_fn("vec2_subtract", EngineApi::vec2_subtract);
    engine.register_fn("vec2_scale", EngineApi::vec2_scale);
    engine.register_fn("vec2_length", EngineApi::vec2_length);
    engine.register_fn("vec2_distance", EngineApi::vec2_distance);
    engine.register_fn("vec2_dot_product", EngineApi::vec2_dot_product);
    engine.register_fn("vec2_angle", EngineApi::vec2_angle);
    engine.register_fn("vec2_normalize", EngineApi::vec2_normalize);
    engine.register_fn("vec2_rotate", EngineApi::vec2_rotate);
    engine.register_fn("vec3_add", EngineApi::vec3_add);
    engine.register_fn("vec3_subtract", EngineApi::vec3_subtract);
    engine.register_fn("vec3_scale", EngineApi::vec3_scale);
    engine.register_fn("vec3_length", EngineApi::vec3_length);
    engine.register_fn("vec3_cross_product", EngineApi::vec3_cross_product);
    engine.register_fn("vec3_normalize", EngineApi::vec3_normalize);

    engine.register_fn("color_from_hsv", EngineApi::color_from_hsv);
    engine.register_fn("color_alpha", EngineApi::color_alpha);
    engine.register_fn("color_alpha_blend", EngineApi::color_alpha_blend);

    engine.register_fn("load_texture", EngineApi::load_texture);
    engine.register_fn("unload_texture", EngineApi::unload_texture);
    engine.register_fn("draw_texture", EngineApi::draw_texture);
    engine.register_fn("draw_texture_pro", EngineApi::draw_texture_pro);
    engine.register_fn("load_sound", EngineApi::load_sound);
    engine.register_fn("play_sound", EngineApi::play_sound);

    engine.register_fn("get_random_value", EngineApi::get_random_value);
    engine.register_fn("clamp", EngineApi::clamp);
    engine.register_fn("log", EngineApi::log);
}
