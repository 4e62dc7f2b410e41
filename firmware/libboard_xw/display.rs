//! Double-buffered RGB565 framebuffer scanout.

pub const WIDTH: usize = 320;
pub const HEIGHT: usize = 240;
pub const PIXELS: usize = WIDTH * HEIGHT;

pub const fn rgb565(r: u8, g: u8, b: u8) -> u16 {
    ((r as u16 & 0x1f) << 11) | ((g as u16 & 0x3f) << 5) | (b as u16 & 0x1f)
}

pub const WHITE: u16 = rgb565(31, 63, 31);
pub const BLACK: u16 = 0;

/// Display controller registers.
pub trait Scanout {
    fn in_vblank(&mut self) -> bool;

    /// Points the scanout at the frame starting at `address`.
    fn set_framebuffer(&mut self, address: u32);
}

pub struct DisplayScanout;

const STATUS_VBLANK: u32 = 1 << 0;

impl Scanout for DisplayScanout {
    fn in_vblank(&mut self) -> bool {
        use crate::mem::DISPLAY_STATUS;
        unsafe { core::ptr::read_volatile(DISPLAY_STATUS as *const u32) & STATUS_VBLANK != 0 }
    }

    fn set_framebuffer(&mut self, address: u32) {
        use crate::mem::DISPLAY_FRAMEBUFFER_ADDR;
        unsafe { core::ptr::write_volatile(DISPLAY_FRAMEBUFFER_ADDR as *mut u32, address) }
    }
}

pub struct Framebuffer<'a> {
    pixels: &'a mut [u16],
}

impl<'a> Framebuffer<'a> {
    pub fn new(pixels: &'a mut [u16]) -> Framebuffer<'a> {
        assert!(pixels.len() >= PIXELS);
        Framebuffer { pixels }
    }

    pub fn clear(&mut self, color: u16) {
        for pixel in self.pixels[..PIXELS].iter_mut() {
            *pixel = color
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<u16> {
        if x < WIDTH && y < HEIGHT {
            Some(self.pixels[y * WIDTH + x])
        } else {
            None
        }
    }

    /// Fills the part of the rectangle that lies on screen.
    pub fn fill_rect(&mut self, x: usize, y: usize, width: usize, height: usize, color: u16) {
        let x_end = x.saturating_add(width).min(WIDTH);
        let y_end = y.saturating_add(height).min(HEIGHT);
        for row in y..y_end {
            let line = &mut self.pixels[row * WIDTH..(row + 1) * WIDTH];
            for pixel in line[x.min(x_end)..x_end].iter_mut() {
                *pixel = color
            }
        }
    }
}

pub struct Display<'a, S> {
    buffers: [&'a mut [u16]; 2],
    back: usize,
    scanout: S,
}

impl<'a, S: Scanout> Display<'a, S> {
    /// Takes two frames of at least `PIXELS` pixels each. The second one is
    /// shown first.
    pub fn new(first: &'a mut [u16], second: &'a mut [u16], scanout: S) -> Display<'a, S> {
        assert!(first.len() >= PIXELS && second.len() >= PIXELS);
        let mut display = Display { buffers: [first, second], back: 0, scanout };
        let front = display.front_address();
        display.scanout.set_framebuffer(front);
        display
    }

    fn front_address(&self) -> u32 {
        self.buffers[self.back ^ 1].as_ptr() as usize as u32
    }

    pub fn back_buffer(&mut self) -> Framebuffer<'_> {
        Framebuffer::new(&mut *self.buffers[self.back])
    }

    pub fn scanout(&mut self) -> &mut S {
        &mut self.scanout
    }

    /// Shows the back buffer. With `vsync` the switch waits for the next
    /// vertical blanking interval so that no frame is torn.
    pub fn swap_buffers(&mut self, vsync: bool) {
        self.back ^= 1;
        if vsync {
            while !self.scanout.in_vblank() {}
        }
        let front = self.front_address();
        self.scanout.set_framebuffer(front);
    }
}

/// A square that bounces between the screen edges, one pixel per step on
/// each axis.
#[derive(Debug, Clone)]
pub struct BouncingBox {
    pub x: usize,
    pub y: usize,
    pub size: usize,
    x_rising: bool,
    y_rising: bool,
}

fn bounce(position: &mut usize, rising: &mut bool, limit: usize) {
    if limit == 0 {
        return
    }
    if *rising {
        *position += 1;
        if *position == limit {
            *rising = false
        }
    } else {
        *position -= 1;
        if *position == 0 {
            *rising = true
        }
    }
}

impl BouncingBox {
    pub fn new(size: usize) -> BouncingBox {
        BouncingBox { x: 0, y: 0, size, x_rising: true, y_rising: true }
    }

    pub fn step(&mut self) {
        bounce(&mut self.x, &mut self.x_rising, WIDTH.saturating_sub(self.size));
        bounce(&mut self.y, &mut self.y_rising, HEIGHT.saturating_sub(self.size));
    }

    pub fn draw(&self, framebuffer: &mut Framebuffer, color: u16) {
        framebuffer.fill_rect(self.x, self.y, self.size, self.size, color)
    }
}
