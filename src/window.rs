use crate::config::WINDOW_TITLE;
use crate::cpu::{InputLatch, MemoryView};
use crate::display::{capture_region, render_frame, DISPLAY_HEIGHT, DISPLAY_WIDTH};
use pixels::{Pixels, SurfaceTexture};
use std::sync::Arc;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::error::EventLoopError;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowId};

struct WindowApp {
	memory_view: MemoryView,
	input: Arc<InputLatch>,
	scale: u32,
	pixels: Option<Pixels<'static>>,
	window: Option<Arc<Window>>,
}

impl WindowApp {
	fn new(memory_view: MemoryView, input: Arc<InputLatch>, scale: u32) -> Self {
		Self {
			memory_view,
			input,
			scale,
			pixels: None,
			window: None,
		}
	}

	fn create_surface(&mut self, event_loop: &ActiveEventLoop) -> Result<(), Box<dyn std::error::Error>> {
		let window = Arc::new(event_loop.create_window(Window::default_attributes()
			.with_title(WINDOW_TITLE)
			.with_inner_size(LogicalSize::new(DISPLAY_WIDTH * self.scale, DISPLAY_HEIGHT * self.scale)))?);

		let window_size = window.inner_size();
		let surface_texture = SurfaceTexture::new(window_size.width, window_size.height, window.clone());
		self.pixels = Some(Pixels::new(DISPLAY_WIDTH, DISPLAY_HEIGHT, surface_texture)?);

		window.request_redraw();
		self.window = Some(window);
		Ok(())
	}

	/* copies whatever the program has drawn so far; no attempt is made to wait for a full frame */
	fn redraw(&mut self, event_loop: &ActiveEventLoop) {
		let Some(pixels) = self.pixels.as_mut() else { return };

		let region = capture_region(&self.memory_view);
		render_frame(&region, pixels.frame_mut());

		if let Err(error) = pixels.render() {
			log::error!("Rendering failed: {error}");
			event_loop.exit();
			return;
		}
		if let Some(window) = self.window.as_ref() {
			window.request_redraw();
		}
	}
}

impl ApplicationHandler for WindowApp {
	fn resumed(&mut self, event_loop: &ActiveEventLoop) {
		if self.window.is_some() {
			return;
		}
		if let Err(error) = self.create_surface(event_loop) {
			log::error!("Could not open display window: {error}");
			event_loop.exit();
		}
	}

	fn window_event(&mut self, event_loop: &ActiveEventLoop, _ : WindowId, event: WindowEvent) {
		match event {
			WindowEvent::RedrawRequested => {
				self.redraw(event_loop);
			}
			WindowEvent::CloseRequested => {
				event_loop.exit();
			}
			WindowEvent::Resized(size) => {
				if let Some(pixels) = self.pixels.as_mut() {
					if let Err(error) = pixels.resize_surface(size.width, size.height) {
						log::warn!("Could not resize surface: {error}");
					}
				}
			}
			WindowEvent::CursorMoved { position, .. } => {
				if let Some(pixels) = self.pixels.as_ref() {
					/* outside the display area sticks to the nearest edge */
					let (x, y) = pixels
						.window_pos_to_pixel((position.x as f32, position.y as f32))
						.unwrap_or_else(|pos| pixels.clamp_pixel_pos(pos));
					self.input.set_pointer(x as u8, y as u8);
				}
			}
			_ => ()
		}
	}
}

pub fn initialize_ui(memory_view: MemoryView, input: Arc<InputLatch>, scale: u32) -> Result<(), EventLoopError> {
	let event_loop = EventLoop::new();
	event_loop?.run_app(&mut WindowApp::new(memory_view, input, scale))
}
