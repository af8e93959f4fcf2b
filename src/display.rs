/*!
Interactive window presenting the machine's framebuffer (feature
`display`).

A thin wrapper with no state machine of its own: each redraw runs the
core for one frame, blits the RGBA buffer through `pixels`, and maps
keyboard input onto the joypad. Pacing to real time is left to the
compositor's redraw cadence; the core itself just produces frames.

Key map: arrows = directions, Z/X = A/B, Enter = Start,
Backspace = Select.
*/

use std::sync::Arc;

use pixels::{Pixels, SurfaceTexture};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::joypad::Button;
use crate::machine::Machine;
use crate::ppu::{SCREEN_HEIGHT, SCREEN_WIDTH};

const WINDOW_SCALE: u32 = 3;

/// Open a window and run the machine until it is closed or a fatal
/// core error surfaces.
pub fn run(machine: Machine) -> Result<(), winit::error::EventLoopError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);
    let mut app = App {
        machine,
        window: None,
        pixels: None,
    };
    event_loop.run_app(&mut app)
}

struct App {
    machine: Machine,
    window: Option<Arc<Window>>,
    pixels: Option<Pixels<'static>>,
}

impl App {
    fn key_to_button(key: KeyCode) -> Option<Button> {
        match key {
            KeyCode::ArrowRight => Some(Button::Right),
            KeyCode::ArrowLeft => Some(Button::Left),
            KeyCode::ArrowUp => Some(Button::Up),
            KeyCode::ArrowDown => Some(Button::Down),
            KeyCode::KeyZ => Some(Button::A),
            KeyCode::KeyX => Some(Button::B),
            KeyCode::Backspace => Some(Button::Select),
            KeyCode::Enter => Some(Button::Start),
            _ => None,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let size = LogicalSize::new(
            SCREEN_WIDTH as u32 * WINDOW_SCALE,
            SCREEN_HEIGHT as u32 * WINDOW_SCALE,
        );
        let attributes = Window::default_attributes()
            .with_title("dotmatrix")
            .with_inner_size(size);
        let window = match event_loop.create_window(attributes) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let inner = window.inner_size();
        let surface = SurfaceTexture::new(inner.width, inner.height, window.clone());
        match Pixels::new(SCREEN_WIDTH as u32, SCREEN_HEIGHT as u32, surface) {
            Ok(p) => self.pixels = Some(p),
            Err(e) => {
                log::error!("failed to create pixel surface: {e}");
                event_loop.exit();
                return;
            }
        }
        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let Some(pixels) = &mut self.pixels {
                    if let Err(e) = pixels.resize_surface(size.width, size.height) {
                        log::error!("surface resize failed: {e}");
                        event_loop.exit();
                    }
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(code) = event.physical_key {
                    if let Some(button) = Self::key_to_button(code) {
                        match event.state {
                            ElementState::Pressed => self.machine.press(button),
                            ElementState::Released => self.machine.release(button),
                        }
                    }
                }
            }
            WindowEvent::RedrawRequested => {
                let frame = match self.machine.run_frame() {
                    Ok(frame) => frame,
                    Err(e) => {
                        log::error!("machine fault: {e}");
                        event_loop.exit();
                        return;
                    }
                };
                if let Some(pixels) = &mut self.pixels {
                    pixels.frame_mut().copy_from_slice(frame);
                    if let Err(e) = pixels.render() {
                        log::error!("render failed: {e}");
                        event_loop.exit();
                        return;
                    }
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}
