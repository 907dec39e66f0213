use chip8_vm::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH, PIXEL_ON};
use chip8_vm::FrameBuffer;
use sdl2::pixels::PixelFormatEnum;
use sdl2::render::WindowCanvas;

/// Bytes per pixel of the RGB24 texture the frame is copied into
const BYTES_PER_PIXEL: usize = 3;

/// # Display
///
/// The Chip-8 display is composed of 64x32 black/white pixels.
/// Each pixel of the window is a `scale` by `scale` square.
/// The display only gets a call to `render` when the Chip-8 FrameBuffer is updated.
pub struct Display {
    canvas: WindowCanvas,
}

impl Display {
    /// Creates a new display object bound to an sdl2 context.
    ///
    /// # Arguments
    /// * `sdl` an sdl2 context with which to draw.
    /// * `scale` the magnitude with which that size of each pixel should be multiplied.
    pub fn new(sdl: &sdl2::Sdl, scale: u32) -> Result<Self, String> {
        let video_subsystem = sdl.video()?;
        let window = video_subsystem
            .window(
                "Chip-8",
                DISPLAY_WIDTH as u32 * scale,
                DISPLAY_HEIGHT as u32 * scale,
            )
            .position_centered()
            .build()
            .map_err(|e| e.to_string())?;
        let canvas = window
            .into_canvas()
            .present_vsync()
            .build()
            .map_err(|e| e.to_string())?;

        let mut display = Display { canvas };
        display.render(&[[0; DISPLAY_WIDTH]; DISPLAY_HEIGHT])?;
        Ok(display)
    }

    /// Renders a single Chip-8 FrameBuffer.
    ///
    /// The frame is copied into a streaming texture the size of the Chip-8 display which is then
    /// stretched over the whole window.
    ///
    /// # Arguments
    /// * `frame` a Chip-8 FrameBuffer that represents the state of every pixel on the Display.
    pub fn render(&mut self, frame: &FrameBuffer) -> Result<(), String> {
        let texture_creator = self.canvas.texture_creator();

        let mut texture = texture_creator
            .create_texture_streaming(
                PixelFormatEnum::RGB24,
                DISPLAY_WIDTH as u32,
                DISPLAY_HEIGHT as u32,
            )
            .map_err(|e| e.to_string())?;

        texture.with_lock(None, |buffer: &mut [u8], pitch: usize| {
            blit(frame, buffer, pitch)
        })?;

        self.canvas.copy(&texture, None, None)?;
        self.canvas.present();
        Ok(())
    }
}

/// Writes `frame` into an RGB24 pixel buffer whose rows are `pitch` bytes apart
pub fn blit(frame: &FrameBuffer, buffer: &mut [u8], pitch: usize) {
    for (y, row) in frame.iter().enumerate() {
        for (x, &pixel) in row.iter().enumerate() {
            let offset = y * pitch + x * BYTES_PER_PIXEL;
            let color = if pixel == PIXEL_ON { 0xFF } else { 0x00 };
            buffer[offset..offset + BYTES_PER_PIXEL].copy_from_slice(&[color; BYTES_PER_PIXEL]);
        }
    }
}
