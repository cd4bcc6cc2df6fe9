//! SDL2 presentation window (`viewer` feature).
//!
//! Each frame is uploaded as BGRA bytes (see [`crate::render::PixelFormat`])
//! into a streaming ARGB8888 texture and copied to the window.

use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::PixelFormatEnum;
use sdl2::render::{Canvas, Texture, TextureCreator};
use sdl2::video::WindowContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEvent {
    None,
    Quit,
}

/// Counts presented frames and reports the rate once per second.
pub struct FpsCounter {
    window_start: u64,
    frames: u32,
}

impl FpsCounter {
    pub fn new(window: &Window) -> Self {
        Self {
            window_start: window.timer().ticks64(),
            frames: 0,
        }
    }

    /// Records a frame; returns the frame rate when a full second has passed.
    pub fn tick(&mut self, window: &Window) -> Option<f64> {
        self.frames += 1;
        let now = window.timer().ticks64();
        let elapsed = now - self.window_start;
        if elapsed < 1000 {
            return None;
        }
        let fps = self.frames as f64 * 1000.0 / elapsed as f64;
        self.window_start = now;
        self.frames = 0;
        Some(fps)
    }
}

pub struct Window {
    // Declared before `texture_creator` so it is dropped first.
    texture: Texture<'static>,
    _texture_creator: Box<TextureCreator<WindowContext>>,
    canvas: Canvas<sdl2::video::Window>,
    event_pump: sdl2::EventPump,
    timer_subsystem: sdl2::TimerSubsystem,
    width: u32,
    height: u32,
}

impl Window {
    pub fn new(title: &str, width: u32, height: u32) -> Result<Self, String> {
        let sdl_context = sdl2::init()?;
        let video_subsystem = sdl_context.video()?;
        let timer_subsystem = sdl_context.timer()?;

        let window = video_subsystem
            .window(title, width, height)
            .position_centered()
            .build()
            .map_err(|e| e.to_string())?;

        let canvas = window.into_canvas().build().map_err(|e| e.to_string())?;
        let texture_creator = Box::new(canvas.texture_creator());
        let event_pump = sdl_context.event_pump()?;

        // SAFETY: texture_creator is heap-allocated, never moved out of its box,
        // and outlives texture (field order above).
        let texture_creator_ref: &'static TextureCreator<WindowContext> =
            unsafe { &*(texture_creator.as_ref() as *const _) };
        let texture = texture_creator_ref
            .create_texture_streaming(PixelFormatEnum::ARGB8888, width, height)
            .map_err(|e| e.to_string())?;

        log::info!("Opened window '{}' ({}x{})", title, width, height);

        Ok(Self {
            texture,
            _texture_creator: texture_creator,
            canvas,
            event_pump,
            timer_subsystem,
            width,
            height,
        })
    }

    pub fn poll_events(&mut self) -> WindowEvent {
        for event in self.event_pump.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => return WindowEvent::Quit,
                _ => {}
            }
        }
        WindowEvent::None
    }

    /// Uploads one frame of BGRA bytes and presents it.
    pub fn present(&mut self, buffer: &[u8]) -> Result<(), String> {
        self.texture
            .update(None, buffer, (self.width * 4) as usize)
            .map_err(|e| e.to_string())?;

        self.canvas.clear();
        self.canvas.copy(&self.texture, None, None)?;
        self.canvas.present();
        Ok(())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn timer(&self) -> &sdl2::TimerSubsystem {
        &self.timer_subsystem
    }
}
