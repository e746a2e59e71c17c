use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, info};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{
    window, HtmlCanvasElement, WebGl2RenderingContext as GL, WebGlBuffer, WebGlProgram, WebGlShader,
    WebGlUniformLocation, WebGlVertexArrayObject,
};

use super::App;
use crate::error::VizError;
use crate::scene::{aspect_scale, SceneLayout, VERTEX_STRIDE};

const VERTEX_SHADER: &str = r#"#version 300 es
in vec2 a_pos;
in vec4 a_color;
uniform vec2 u_scale;
out vec4 v_color;
void main() {
    v_color = a_color;
    gl_Position = vec4(a_pos * u_scale, 0.0, 1.0);
}
"#;

const FRAGMENT_SHADER: &str = r#"#version 300 es
precision mediump float;
in vec4 v_color;
out vec4 out_color;
void main() {
    out_color = v_color;
}
"#;

/// WebGL2 state for drawing a [`SceneLayout`].
pub struct Renderer {
    gl: GL,
    canvas: HtmlCanvasElement,
    program: WebGlProgram,
    vao: WebGlVertexArrayObject,
    vbo: WebGlBuffer,
    u_scale: Option<WebGlUniformLocation>,
}

impl Renderer {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, VizError> {
        let gl: GL = canvas
            .get_context("webgl2")
            .ok()
            .flatten()
            .ok_or_else(|| VizError::WebGl("WebGL2 not supported".into()))?
            .dyn_into()
            .map_err(|_| VizError::WebGl("context is not WebGL2".into()))?;

        let vs = compile(&gl, GL::VERTEX_SHADER, VERTEX_SHADER)?;
        let fs = compile(&gl, GL::FRAGMENT_SHADER, FRAGMENT_SHADER)?;
        let program = link(&gl, &vs, &fs)?;

        let vao = gl
            .create_vertex_array()
            .ok_or_else(|| VizError::WebGl("create_vertex_array failed".into()))?;
        let vbo = gl
            .create_buffer()
            .ok_or_else(|| VizError::WebGl("create_buffer failed".into()))?;

        gl.bind_vertex_array(Some(&vao));
        gl.bind_buffer(GL::ARRAY_BUFFER, Some(&vbo));
        let stride = (VERTEX_STRIDE * std::mem::size_of::<f32>()) as i32;
        let a_pos = gl.get_attrib_location(&program, "a_pos") as u32;
        let a_color = gl.get_attrib_location(&program, "a_color") as u32;
        gl.enable_vertex_attrib_array(a_pos);
        gl.vertex_attrib_pointer_with_i32(a_pos, 2, GL::FLOAT, false, stride, 0);
        gl.enable_vertex_attrib_array(a_color);
        gl.vertex_attrib_pointer_with_i32(a_color, 4, GL::FLOAT, false, stride, 2 * 4);
        gl.bind_vertex_array(None);

        gl.enable(GL::BLEND);
        gl.blend_func(GL::SRC_ALPHA, GL::ONE_MINUS_SRC_ALPHA);

        let u_scale = gl.get_uniform_location(&program, "u_scale");
        info!("renderer ready");
        Ok(Self {
            gl,
            canvas,
            program,
            vao,
            vbo,
            u_scale,
        })
    }

    /// Match the drawing buffer to the window size.
    pub fn resize(&self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        self.gl.viewport(0, 0, width as i32, height as i32);
        debug!("resized to {width}x{height}");
    }

    pub fn draw(&self, layout: &SceneLayout) {
        let gl = &self.gl;
        gl.clear_color(0.08, 0.09, 0.12, 1.0);
        gl.clear(GL::COLOR_BUFFER_BIT);

        let vertices = layout.vertices();
        if vertices.is_empty() {
            return;
        }

        gl.use_program(Some(&self.program));
        let (sx, sy) = aspect_scale(self.canvas.width() as f32, self.canvas.height() as f32);
        gl.uniform2f(self.u_scale.as_ref(), sx, sy);

        gl.bind_vertex_array(Some(&self.vao));
        gl.bind_buffer(GL::ARRAY_BUFFER, Some(&self.vbo));
        // The view must not outlive this call: any allocation on the wasm
        // heap would invalidate it.
        unsafe {
            let view = js_sys::Float32Array::view(&vertices);
            gl.buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &view, GL::DYNAMIC_DRAW);
        }
        gl.draw_arrays(GL::TRIANGLES, 0, (vertices.len() / VERTEX_STRIDE) as i32);
        gl.bind_vertex_array(None);
    }
}

fn compile(gl: &GL, kind: u32, source: &str) -> Result<WebGlShader, VizError> {
    let shader = gl
        .create_shader(kind)
        .ok_or_else(|| VizError::WebGl("create_shader failed".into()))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);
    if gl
        .get_shader_parameter(&shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(shader)
    } else {
        Err(VizError::WebGl(gl.get_shader_info_log(&shader).unwrap_or_default()))
    }
}

fn link(gl: &GL, vs: &WebGlShader, fs: &WebGlShader) -> Result<WebGlProgram, VizError> {
    let program = gl
        .create_program()
        .ok_or_else(|| VizError::WebGl("create_program failed".into()))?;
    gl.attach_shader(&program, vs);
    gl.attach_shader(&program, fs);
    gl.link_program(&program);
    if gl
        .get_program_parameter(&program, GL::LINK_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(program)
    } else {
        Err(VizError::WebGl(gl.get_program_info_log(&program).unwrap_or_default()))
    }
}

fn window_size() -> Option<(u32, u32)> {
    let w = window()?;
    let width = w.inner_width().ok()?.as_f64()?;
    let height = w.inner_height().ok()?.as_f64()?;
    Some((width as u32, height as u32))
}

fn now_ms() -> f64 {
    window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

/// Start the render loop: every animation frame drains pending model
/// changes into the panels and redraws the scene.
pub fn start(renderer: Renderer, app: Rc<RefCell<App>>) -> Result<(), JsValue> {
    let win = window().ok_or(VizError::Dom("window"))?;
    let renderer = Rc::new(renderer);

    if let Some((w, h)) = window_size() {
        renderer.resize(w, h);
    }
    let resize_closure = {
        let renderer = Rc::clone(&renderer);
        Closure::wrap(Box::new(move || {
            if let Some((w, h)) = window_size() {
                renderer.resize(w, h);
            }
        }) as Box<dyn FnMut()>)
    };
    win.add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref())?;
    resize_closure.forget();

    // Animation loop
    // `f` holds the animation-frame closure so that we can keep calling
    // `request_animation_frame` recursively. Storing it inside an `Option`
    // allows us to create the `Closure` first and then obtain a reference to
    // it from within itself.
    let f: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        let layout = app.borrow_mut().frame(now_ms());
        renderer.draw(&layout);

        // schedule next
        if let (Some(win), Some(cb)) = (window(), f.borrow().as_ref()) {
            let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut()>));

    if let Some(cb) = g.borrow().as_ref() {
        win.request_animation_frame(cb.as_ref().unchecked_ref())?;
    }
    Ok(())
}
