use crate::emulator::bus::interrupts::{InterruptManager, Interrupts};
use crate::emulator::frame::RgbaFrame;
use crate::emulator::ppu::oam::OamRam;
use crate::emulator::ppu::palette::Palette;
use crate::emulator::ppu::registers::{
    AlphaBlendCoefficients, BgControl, BgRotationParam, BgRotationRef, BgScrolling, BrightnessCoefficients,
    ColorSpecialSelection, LcdControl, LcdStatus, MosaicFunction, VerticalCounter, WindowControl, WindowDimensions,
};
use crate::emulator::MemoryAddress;
use crate::scheduler::{EmuTime, EventTag, Scheduler};

#[cfg(feature = "debug-functionality")]
pub mod debug;
mod memory;
pub mod oam;
pub mod palette;
pub mod registers;

pub use oam::OAM_RAM_SIZE;
pub use palette::RGBA;

pub const LCD_IO_START: MemoryAddress = 0x4000000;
pub const LCD_IO_END: MemoryAddress = 0x4000056;
pub const DISPLAY_WIDTH: u32 = 240;
pub const DISPLAY_HEIGHT: u32 = 160;

/// VRAM is 96KiB, laid out as 64KiB of BG tile/map data followed by two mirrored 16KiB OBJ banks.
pub const VRAM_SIZE: usize = 96 * 1024;

/// Cycles of visible drawing before HBlank starts.
const H_DRAW_CYCLES: u64 = 960;
/// Total cycles, draw + HBlank, making up one scanline.
const CYCLES_PER_SCANLINE: u64 = 1232;
const VISIBLE_SCANLINES: u8 = 160;
const TOTAL_SCANLINES: u8 = 228;

/// 15 bit colour, 96KB of VRAM, 256 BG + 256 OBJ palette entries, 128 sprites, 6 video modes:
/// Mode 0..=2 are tile modes, Mode 3..=5 are bitmap modes.
///
/// Per-scanline pixel compositing is an external collaborator (see crate docs): this type owns
/// display registers, VRAM/OAM/palette storage, and the scanline timing state machine, but
/// `step` only produces a flat backdrop-coloured scanline rather than running the full
/// tile/sprite renderer.
pub struct PPU {
    pub(crate) disp_cnt: LcdControl,
    pub(crate) green_swap: u16,
    pub(crate) disp_stat: LcdStatus,
    pub(crate) vertical_counter: VerticalCounter,
    pub(crate) bg_control: [BgControl; 4],
    /// `[bg][0]` is the X scroll register, `[bg][1]` is the Y scroll register.
    pub(crate) bg_scrolling: [[BgScrolling; 2]; 4],
    pub(crate) bg_rotation_reference_bg2: [BgRotationParam; 4],
    pub(crate) bg_rotation_reference_bg3: [BgRotationParam; 4],
    /// `[0]` is BG2's reference point, `[1]` is BG3's.
    pub(crate) bg_rotation_x: [BgRotationRef; 2],
    pub(crate) bg_rotation_y: [BgRotationRef; 2],
    pub(crate) window_horizontal: [WindowDimensions; 2],
    pub(crate) window_vertical: [WindowDimensions; 2],
    pub(crate) window_control_inside: WindowControl,
    pub(crate) window_control_outside: WindowControl,
    pub(crate) mosaic_function: MosaicFunction,
    pub(crate) bld_cnt: ColorSpecialSelection,
    pub(crate) alpha: AlphaBlendCoefficients,
    pub(crate) brightness: BrightnessCoefficients,

    pub(crate) palette: Palette,
    pub(crate) vram: Box<[u8; VRAM_SIZE]>,
    pub(crate) oam: OamRam,

    /// Written to during rendering; swapped with `front_buffer` on VBlank.
    back_buffer: RgbaFrame,
    /// Read by the host shell; stable for the entire duration of a frame.
    front_buffer: RgbaFrame,
}

impl PPU {
    pub fn new() -> Self {
        PPU {
            disp_cnt: LcdControl::new(),
            green_swap: 0,
            disp_stat: LcdStatus::new(),
            vertical_counter: VerticalCounter::new(),
            bg_control: [BgControl::new(); 4],
            bg_scrolling: [[BgScrolling::new(); 2]; 4],
            bg_rotation_reference_bg2: [BgRotationParam::new(); 4],
            bg_rotation_reference_bg3: [BgRotationParam::new(); 4],
            bg_rotation_x: [BgRotationRef::new(); 2],
            bg_rotation_y: [BgRotationRef::new(); 2],
            window_horizontal: [WindowDimensions::new(); 2],
            window_vertical: [WindowDimensions::new(); 2],
            window_control_inside: WindowControl::new(),
            window_control_outside: WindowControl::new(),
            mosaic_function: MosaicFunction::new(),
            bld_cnt: ColorSpecialSelection::new(),
            alpha: AlphaBlendCoefficients::new(),
            brightness: BrightnessCoefficients::new(),
            palette: Palette::new(),
            vram: crate::box_array![0; VRAM_SIZE],
            oam: OamRam::new(),
            back_buffer: RgbaFrame::new(),
            front_buffer: RgbaFrame::new(),
        }
    }

    /// Schedule the very first HBlank of the run.
    pub fn initial_startup(&mut self, scheduler: &mut Scheduler) {
        scheduler.schedule_event(EventTag::HBlank, EmuTime(H_DRAW_CYCLES));
    }

    /// Entering HBlank: set the status flag, optionally raise the interrupt, and schedule the
    /// matching `HBlankEnd` for when the next scanline's drawing period begins.
    pub fn hblank_start(&mut self, scheduler: &mut Scheduler, interrupts: &mut InterruptManager) {
        self.disp_stat.set_h_blank_flag(true);

        if self.disp_stat.h_blank_irq_enable() {
            interrupts.request_interrupt(Interrupts::Hblank, scheduler);
        }

        scheduler.schedule_event(
            EventTag::HBlankEnd,
            scheduler.current_time + EmuTime(CYCLES_PER_SCANLINE - H_DRAW_CYCLES),
        );
    }

    /// Leaving HBlank: clear the flag, advance VCOUNT (wrapping 227->0), re-evaluate the
    /// VCOUNT-match interrupt, and produce the scanline about to become visible.
    pub fn hblank_end(&mut self, scheduler: &mut Scheduler, interrupts: &mut InterruptManager) {
        self.disp_stat.set_h_blank_flag(false);

        let next_line = (self.vertical_counter.current_scanline() + 1) % TOTAL_SCANLINES;
        self.vertical_counter.set_current_scanline(next_line);

        let matched = next_line == self.disp_stat.v_count_setting_lyc();
        self.disp_stat.set_v_counter_flag(matched);
        if matched && self.disp_stat.v_counter_irq_enable() {
            interrupts.request_interrupt(Interrupts::VCounter, scheduler);
        }

        if next_line == VISIBLE_SCANLINES {
            self.disp_stat.set_v_blank_flag(true);
            if self.disp_stat.v_blank_irq_enable() {
                interrupts.request_interrupt(Interrupts::Vblank, scheduler);
            }
            scheduler.schedule_event(EventTag::VBlank, scheduler.current_time);
        } else if next_line == 0 {
            self.disp_stat.set_v_blank_flag(false);
        }

        if next_line < VISIBLE_SCANLINES {
            self.step(next_line);
        }

        scheduler.schedule_event(EventTag::HBlank, scheduler.current_time + EmuTime(H_DRAW_CYCLES));
    }

    /// Produce the given scanline (0..DISPLAY_HEIGHT) into the back buffer.
    fn step(&mut self, scanline: u8) {
        let backdrop = self.palette.color(0);
        let row_start = scanline as usize * DISPLAY_WIDTH as usize;

        for pixel in &mut self.back_buffer[row_start..row_start + DISPLAY_WIDTH as usize] {
            *pixel = backdrop;
        }
    }

    /// Entering VBlank: swap the finished back buffer to the front for the host shell to read.
    pub fn vblank(&mut self, _scheduler: &mut Scheduler, _interrupts: &mut InterruptManager) {
        std::mem::swap(&mut self.front_buffer, &mut self.back_buffer);
    }

    /// The most recently completed frame, stable until the next VBlank swap.
    pub fn frame_buffer(&mut self) -> &mut RgbaFrame {
        &mut self.front_buffer
    }
}
