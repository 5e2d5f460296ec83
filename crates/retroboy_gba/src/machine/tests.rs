use retroboy_common::Color;

use super::bios::BIOS_SIZE;
use super::*;
use crate::cpu::{Cpu, CpuMode, CpuState, MemoryBus, Processor, StatusFlag};
use crate::SCREEN_WIDTH;

const RED: u16 = 0x001F;
const GREEN: u16 = 0x03E0;
const BLUE: u16 = 0x7C00;

/// BG0 tile map lives in screen block 8 (0x06004000) for the render tests so
/// it never overlaps the first few tiles of character block 0.
const BG0_MAP: u32 = 0x0600_4000;
const BG1_MAP: u32 = 0x0600_4800;

fn header_rom() -> Vec<u8> {
    let mut data = vec![0u8; 0x200];
    data[0..4].copy_from_slice(&0xEA00_002Eu32.to_le_bytes());
    data[0xA0..0xA7].copy_from_slice(b"TESTROM");
    data[0xAC..0xB0].copy_from_slice(b"ATSE");
    data[0xB0..0xB2].copy_from_slice(b"01");
    data[0xB2] = 0x96;
    data[0xBC] = 0x02;
    let sum = data[0xA0..0xBD]
        .iter()
        .fold(0u8, |acc, &b| acc.wrapping_add(b));
    data[0xBD] = 0u8.wrapping_sub(sum).wrapping_sub(0x19);
    data
}

fn bios_image() -> Bios {
    let mut data = vec![0u8; BIOS_SIZE];
    data[0..4].copy_from_slice(&0xEA00_0018u32.to_le_bytes());
    Bios::from_bytes(data).unwrap()
}

fn machine() -> GameBoyAdvance {
    let rom = Rom::from_bytes(header_rom()).unwrap();
    GameBoyAdvance::new(MachineConfig::builder().rom(rom).build()).unwrap()
}

fn machine_with_bios(skip_bios: bool) -> GameBoyAdvance {
    let rom = Rom::from_bytes(header_rom()).unwrap();
    let config = MachineConfig::builder()
        .rom(rom)
        .bios(Some(bios_image()))
        .skip_bios(skip_bios)
        .build();
    GameBoyAdvance::new(config).unwrap()
}

/// Mode 0 with BG0 enabled, map in screen block 8, red backdrop.
fn text_bg_machine() -> GameBoyAdvance {
    let mut gba = machine();
    gba.bus.write_half_word(0x0400_0000, 0x0100).unwrap();
    gba.bus.write_half_word(0x0400_0008, 0x0800).unwrap();
    gba.bus.write_half_word(0x0500_0000, RED).unwrap();
    gba
}

fn sample_bg0(gba: &GameBoyAdvance, line: usize) -> [u8; SCREEN_WIDTH] {
    let mut out = [0u8; SCREEN_WIDTH];
    gba.bus.lcd().backgrounds[0].sample_scanline(line, gba.bus.vram(), &mut out);
    out
}

#[test]
fn ram_regions_round_trip_every_width() {
    let mut gba = machine();
    let addrs = [
        0x0200_0000,
        0x0203_FFFC,
        0x0300_0000,
        0x0300_7FFC,
        0x0500_0000,
        0x0500_03FC,
        0x0600_0000,
        0x0601_7FFC,
        0x0700_0000,
    ];
    for addr in addrs {
        gba.bus.write_word(addr, 0xDEAD_BEEF).unwrap();
        assert_eq!(gba.bus.read_word(addr).unwrap(), 0xDEAD_BEEF, "word at {addr:08X}");

        gba.bus.write_half_word(addr, 0x1234).unwrap();
        assert_eq!(gba.bus.read_half_word(addr).unwrap(), 0x1234, "half at {addr:08X}");

        gba.bus.write_byte(addr + 3, 0x5A).unwrap();
        assert_eq!(gba.bus.read_byte(addr + 3).unwrap(), 0x5A, "byte at {addr:08X}");
    }
}

#[test]
fn wide_reads_compose_bytes_little_endian() {
    let mut gba = machine();
    for (i, b) in [0x78u8, 0x56, 0x34, 0x12].into_iter().enumerate() {
        gba.bus.write_byte(0x0300_0010 + i as u32, b).unwrap();
    }

    assert_eq!(gba.bus.read_half_word(0x0300_0010).unwrap(), 0x5678);
    assert_eq!(gba.bus.read_half_word(0x0300_0012).unwrap(), 0x1234);
    assert_eq!(gba.bus.read_word(0x0300_0010).unwrap(), 0x1234_5678);
}

#[test]
fn misaligned_load_rotates_the_aligned_word() {
    let mut gba = machine();
    gba.bus.write_word(0x0200_0000, 0x1122_3344).unwrap();

    assert_eq!(gba.load_word_checked(0x0200_0000).unwrap(), 0x1122_3344);
    assert_eq!(gba.load_word_checked(0x0200_0001).unwrap(), 0x4411_2233);
    assert_eq!(gba.load_word_checked(0x0200_0002).unwrap(), 0x3344_1122);
    assert_eq!(gba.load_word_checked(0x0200_0003).unwrap(), 0x2233_4411);
}

#[test]
fn misaligned_store_writes_the_aligned_word_unrotated() {
    let mut gba = machine();
    gba.store_word_checked(0x0200_0007, 0xAABB_CCDD).unwrap();

    assert_eq!(gba.bus.read_word(0x0200_0004).unwrap(), 0xAABB_CCDD);
    assert_eq!(gba.bus.read_word(0x0200_0008).unwrap(), 0);
}

#[test]
fn read_write_word_checked_dispatches_on_direction() {
    let mut gba = machine();
    let mut value = 0xCAFE_F00D;
    gba.bus
        .read_write_word_checked(0x0300_0001, &mut value, false, &gba.cpu)
        .unwrap();
    assert_eq!(gba.bus.read_word(0x0300_0000).unwrap(), 0xCAFE_F00D);

    let mut loaded = 0;
    gba.bus
        .read_write_word_checked(0x0300_0001, &mut loaded, true, &gba.cpu)
        .unwrap();
    assert_eq!(loaded, 0xCAFE_F00Du32.rotate_right(8));
}

#[test]
fn unmapped_load_returns_the_prefetched_opcode() {
    let mut gba = machine();
    assert_eq!(gba.cpu.pc(), 0x0800_0000);
    assert_eq!(gba.load_word_checked(0x1000_0000).unwrap(), 0xEA00_002E);
    assert_eq!(gba.load_word_checked(0xFFFF_FFFD).unwrap(), 0xEA00_002E);

    gba.cpu.set_state(CpuState::Thumb);
    gba.cpu.set_pc(0x0800_0002);
    assert_eq!(gba.load_word_checked(0x1000_0000).unwrap(), 0xEA00_EA00);
}

#[test]
fn dma_word_count_load_returns_control_half() {
    let mut gba = machine();
    for (cnt_l, control) in [
        (0x0400_00B8u32, 0x8400u16),
        (0x0400_00C4, 0x8000),
        (0x0400_00D0, 0x0240),
        (0x0400_00DC, 0xB640),
    ] {
        gba.bus.write_half_word(cnt_l, 0xFFFF).unwrap();
        gba.bus.write_half_word(cnt_l + 2, control).unwrap();
        assert_eq!(
            gba.load_word_checked(cnt_l).unwrap(),
            (control as u32) << 16,
            "DMA CNT_L at {cnt_l:08X}"
        );
    }
}

#[test]
fn bios_reads_are_protected_outside_the_bios() {
    let mut gba = machine_with_bios(false);
    assert_eq!(gba.cpu.pc(), Cpu::RESET_VECTOR);
    assert_eq!(gba.load_word_checked(0x0000_0000).unwrap(), 0xEA00_0018);

    let mut gba = machine_with_bios(true);
    assert_eq!(gba.cpu.pc(), Cpu::ROM_ENTRY);
    assert_eq!(
        gba.load_word_checked(0x0000_0000).unwrap(),
        BiosState::Startup.latched_opcode()
    );

    if let Some(bios) = gba.bus.bios_mut() {
        bios.state = BiosState::SwiFinish;
    }
    assert_eq!(gba.load_word_checked(0x0000_1000).unwrap(), 0xE3A0_2004);
}

#[test]
fn ime_reads_zero_and_discards_writes() {
    let mut gba = machine();
    gba.bus.write_byte(0x0400_0208, 0x01).unwrap();

    assert_eq!(gba.bus.read_byte(0x0400_0208).unwrap(), 0);
    assert_eq!(gba.bus.interrupts().master_enable(), 0);
}

#[test]
fn if_writes_acknowledge_requests() {
    let mut gba = machine();
    gba.request_interrupt(Interrupt::VBLANK | Interrupt::HBLANK | Interrupt::DMA0);
    assert_eq!(gba.bus.read_half_word(0x0400_0202).unwrap(), 0x0103);

    gba.bus.write_half_word(0x0400_0202, 0x0101).unwrap();
    assert_eq!(gba.bus.interrupts().request(), Interrupt::HBLANK);
    assert_eq!(gba.bus.read_half_word(0x0400_0202).unwrap(), 0x0002);
}

#[test]
fn ie_register_reads_back_what_was_written() {
    let mut gba = machine();
    gba.bus.write_half_word(0x0400_0200, 0x2005).unwrap();

    assert_eq!(gba.bus.read_half_word(0x0400_0200).unwrap(), 0x2005);
    assert_eq!(
        gba.bus.interrupts().enable(),
        Interrupt::VBLANK | Interrupt::VCOUNTER_MATCH | Interrupt::GAME_PAK
    );
}

#[test]
fn keyinput_reports_no_buttons_and_ignores_writes() {
    let mut gba = machine();
    assert_eq!(gba.bus.read_half_word(0x0400_0130).unwrap(), 0x03FF);

    gba.bus.write_half_word(0x0400_0130, 0x0000).unwrap();
    assert_eq!(gba.bus.read_half_word(0x0400_0130).unwrap(), 0x03FF);
}

#[test]
fn dispstat_status_bits_are_read_only() {
    let mut gba = machine();
    gba.bus.write_byte(0x0400_0004, 0xFF).unwrap();
    assert_eq!(gba.bus.read_byte(0x0400_0004).unwrap(), 0xF8);

    gba.render_frame();
    assert_eq!(gba.bus.read_byte(0x0400_0004).unwrap(), 0xF9);
    assert_eq!(gba.bus.read_byte(0x0400_0006).unwrap(), 160);
}

#[test]
fn unmapped_addresses_report_bad_address() {
    let mut gba = machine();
    for addr in [0x0000_4000u32, 0x0100_0000, 0x0204_0000, 0x0400_0400, 0x0601_8000] {
        assert!(
            matches!(
                gba.bus.read_byte(addr),
                Err(GbaError::BadAddress { address, access: Access::Read }) if address == addr
            ),
            "read at {addr:08X}"
        );
    }
    assert!(matches!(
        gba.bus.write_byte(0x0A00_0000, 0),
        Err(GbaError::BadAddress {
            address: 0x0A00_0000,
            access: Access::Write
        })
    ));
}

#[test]
fn bios_region_without_image_is_unimplemented() {
    let mut gba = machine();
    assert!(matches!(
        gba.bus.read_byte(0x0000_0010),
        Err(GbaError::UnimplementedRegion {
            address: 0x0000_0010,
            ..
        })
    ));
    assert!(matches!(
        gba.bus.write_byte(0x0000_0010, 1),
        Err(GbaError::UnimplementedRegion { .. })
    ));
}

#[test]
fn short_rom_reads_and_open_bus_past_the_end() {
    let rom = Rom::from_bytes(vec![0x00, 0x08]).unwrap();
    let mut gba = GameBoyAdvance::new(MachineConfig::builder().rom(rom).build()).unwrap();

    assert_eq!(gba.bus.read_half_word(0x0800_0000).unwrap(), 0x0800);
    assert_eq!(gba.bus.read_half_word(0x0800_0010).unwrap(), 0x0008);
    assert_eq!(gba.rom_title(), "");
}

#[test]
fn rom_writes_are_ignored() {
    let mut gba = machine();
    gba.bus.write_word(0x0800_0000, 0).unwrap();
    assert_eq!(gba.bus.read_word(0x0800_0000).unwrap(), 0xEA00_002E);
}

#[test]
fn rom_header_fields_are_decoded() {
    let rom = Rom::from_bytes(header_rom()).unwrap();

    assert_eq!(rom.title(), "TESTROM");
    assert_eq!(rom.game_code(), "ATSE");
    assert_eq!(rom.maker_code(), "01");
    assert_eq!(rom.software_version(), 2);
    assert_eq!(rom.entry_point(), 0xEA00_002E);
    assert_eq!(rom.len(), 0x200);
    assert_eq!(rom.file_name(), None);
}

#[test]
fn image_loaders_reject_bad_sizes() {
    assert!(matches!(
        Rom::from_bytes(Vec::new()),
        Err(GbaError::ImageLoad {
            image: ImageKind::Rom,
            ..
        })
    ));
    assert!(matches!(
        Bios::from_bytes(vec![0; BIOS_SIZE - 1]),
        Err(GbaError::ImageLoad {
            image: ImageKind::Bios,
            ..
        })
    ));
    assert!(matches!(
        Rom::load("/nonexistent/retroboy_gba/test.gba"),
        Err(GbaError::Io { .. })
    ));
}

#[test]
fn oam_is_mirrored_through_its_page() {
    let mut gba = machine();
    gba.bus.write_byte(0x0700_0010, 0x5A).unwrap();

    assert_eq!(gba.bus.read_byte(0x0700_0410).unwrap(), 0x5A);
    assert_eq!(gba.bus.read_byte(0x07FF_FC10).unwrap(), 0x5A);
    assert_eq!(gba.bus.oam()[0x10], 0x5A);
}

#[test]
fn video_ram_is_shared_between_bus_and_renderer() {
    let mut gba = machine();
    gba.bus.write_half_word(0x0600_1234, 0xBEEF).unwrap();
    assert_eq!(&gba.bus.vram()[0x1234..0x1236], &[0xEF, 0xBE]);

    gba.bus.vram_mut()[0x2000] = 0x77;
    assert_eq!(gba.bus.read_byte(0x0600_2000).unwrap(), 0x77);
}

#[test]
fn tile_map_resets_only_when_screen_base_changes() {
    let mut gba = machine();
    let resets = |gba: &GameBoyAdvance| gba.bus.lcd().backgrounds[0].tile_map().reset_count;
    let initial = resets(&gba);

    // Same screen base block.
    gba.bus.write_byte(0x0400_0009, 0x00).unwrap();
    assert_eq!(resets(&gba), initial);

    gba.bus.write_byte(0x0400_0009, 0x05).unwrap();
    assert_eq!(resets(&gba), initial + 1);
    assert_eq!(gba.bus.lcd().backgrounds[0].tile_map().base_offset(), 5 * 0x800);

    // Size bits change, base does not: data is re-cached, map is kept.
    gba.bus.write_byte(0x0400_0009, 0x45).unwrap();
    assert_eq!(resets(&gba), initial + 1);
    assert_eq!(gba.bus.lcd().backgrounds[0].size(), BgSize::Bg512x256);

    gba.bus.write_byte(0x0400_0008, 0x84).unwrap();
    assert_eq!(resets(&gba), initial + 1);
    assert_eq!(gba.bus.lcd().backgrounds[0].tile_data_offset(), 0x4000);
    assert_eq!(
        gba.bus.lcd().backgrounds[0].palette_mode(),
        BgPaletteMode::Palette256x1
    );
    assert_eq!(gba.bus.read_half_word(0x0400_0008).unwrap(), 0x4584);
}

#[test]
fn scroll_registers_are_nine_bits() {
    let mut gba = machine();
    gba.bus.write_half_word(0x0400_0014, 0xFFFF).unwrap();
    gba.bus.write_half_word(0x0400_001E, 0x0123).unwrap();

    assert_eq!(gba.bus.lcd().backgrounds[1].scroll_x, 0x1FF);
    assert_eq!(gba.bus.lcd().backgrounds[3].scroll_y, 0x123);
}

#[test]
fn horizontal_scroll_wraps_around_the_background() {
    let mut gba = text_bg_machine();
    gba.bus.write_half_word(0x0500_0006, GREEN).unwrap();
    // Entry (0, 0) -> tile 1; tile 1 row 0 column 4 = colour 3.
    gba.bus.write_half_word(BG0_MAP, 0x0001).unwrap();
    gba.bus.write_byte(0x0600_0022, 0x03).unwrap();
    gba.bus.write_half_word(0x0400_0010, 250).unwrap();

    gba.render_scanline(0);

    // 250 + 10 = 260 wraps to background column 4.
    assert_eq!(gba.frame().pixel(10, 0), Color::from_bgr555(GREEN));
    assert_eq!(gba.frame().pixel(0, 0), Color::from_bgr555(RED));
    assert_eq!(gba.frame().pixel(9, 0), Color::from_bgr555(RED));
}

#[test]
fn vertical_scroll_wraps_around_the_background() {
    let mut gba = text_bg_machine();
    gba.bus.write_half_word(0x0500_0006, GREEN).unwrap();
    // Entry (0, 0) -> tile 1; tile 1 row 2 column 0 = colour 3.
    gba.bus.write_half_word(BG0_MAP, 0x0001).unwrap();
    gba.bus.write_byte(0x0600_0028, 0x03).unwrap();
    gba.bus.write_half_word(0x0400_0012, 250).unwrap();

    // 250 + 8 = 258 wraps to background row 2.
    assert_eq!(sample_bg0(&gba, 8)[0], 3);
    // 250 + 5 = 255 is the last row of the map, tile 0.
    assert_eq!(sample_bg0(&gba, 5)[0], 0);

    gba.render_scanline(8);
    assert_eq!(gba.frame().pixel(0, 8), Color::from_bgr555(GREEN));
}

#[test]
fn oversized_scroll_values_wrap_before_sampling() {
    let mut gba = text_bg_machine();
    gba.bus.write_half_word(BG0_MAP, 0x0001).unwrap();
    gba.bus.write_byte(0x0600_0028, 0x03).unwrap();

    // 0xFFFF_FFFA % 256 == 250 on both axes.
    gba.bus.lcd_mut().backgrounds[0].scroll_y = 0xFFFF_FFFA;
    gba.bus.lcd_mut().backgrounds[0].scroll_x = 0xFFFF_FFFA;
    let line = sample_bg0(&gba, 8);
    assert_eq!(line[6], 3);
    assert_eq!(line[0], 0);

    gba.bus.lcd_mut().backgrounds[0].scroll_y = u32::MAX;
    gba.bus.lcd_mut().backgrounds[0].scroll_x = u32::MAX;
    let line = sample_bg0(&gba, 159);
    assert_eq!(line[0], 0);
}

#[test]
fn four_bpp_pixels_use_low_nibble_first() {
    let mut gba = text_bg_machine();
    gba.bus.write_half_word(BG0_MAP, 0x2001).unwrap();
    gba.bus.write_byte(0x0600_0020, 0x21).unwrap();

    let line = sample_bg0(&gba, 0);
    assert_eq!(line[0], 2 * 16 + 1);
    assert_eq!(line[1], 2 * 16 + 2);
    assert_eq!(line[2], 0);
}

#[test]
fn transparent_pixels_show_the_backdrop() {
    let mut gba = text_bg_machine();
    // Sub-palette 2 entry 0 must never be used.
    gba.bus.write_half_word(0x0500_0040, GREEN).unwrap();
    gba.bus.write_half_word(0x0500_0042, BLUE).unwrap();
    gba.bus.write_half_word(BG0_MAP, 0x2001).unwrap();
    gba.bus.write_byte(0x0600_0020, 0x10).unwrap();

    let palette = bg_palette(gba.bus.palette_ram());
    let mut frame = FrameBuffer::new();
    gba.bus.lcd().backgrounds[0].render_scanline(0, gba.bus.vram(), &palette, &mut frame);
    assert_eq!(frame.pixel(0, 0), Color::from_bgr555(RED));
    assert_eq!(frame.pixel(1, 0), Color::from_bgr555(BLUE));

    gba.render_scanline(0);
    assert_eq!(gba.frame().pixel(0, 0), Color::from_bgr555(RED));
    assert_eq!(gba.frame().pixel(1, 0), Color::from_bgr555(BLUE));
}

#[test]
fn tile_entries_apply_flips() {
    let mut gba = text_bg_machine();
    gba.bus.write_byte(0x0600_0020, 0x05).unwrap();
    gba.bus.write_byte(0x0600_003C, 0x06).unwrap();

    gba.bus.write_half_word(BG0_MAP, 0x0401).unwrap();
    let line = sample_bg0(&gba, 0);
    assert_eq!(line[0], 0);
    assert_eq!(line[7], 5);

    gba.bus.write_half_word(BG0_MAP, 0x0801).unwrap();
    let line = sample_bg0(&gba, 0);
    assert_eq!(line[0], 6);
}

#[test]
fn eight_bpp_tiles_index_the_full_palette() {
    let mut gba = text_bg_machine();
    gba.bus.write_byte(0x0400_0008, 0x80).unwrap();
    gba.bus.write_half_word(BG0_MAP, 0x0001).unwrap();
    gba.bus.write_byte(0x0600_0040, 0x42).unwrap();
    gba.bus.write_byte(0x0600_0047, 0xFF).unwrap();

    let line = sample_bg0(&gba, 0);
    assert_eq!(line[0], 0x42);
    assert_eq!(line[1], 0);
    assert_eq!(line[7], 0xFF);
}

#[test]
fn wide_backgrounds_span_screen_blocks() {
    let mut gba = text_bg_machine();
    gba.bus.write_byte(0x0400_0009, 0x48).unwrap();
    gba.bus.write_half_word(BG0_MAP + 0x800, 0x0001).unwrap();
    gba.bus.write_byte(0x0600_0020, 0x07).unwrap();
    gba.bus.write_half_word(0x0400_0010, 256).unwrap();

    let line = sample_bg0(&gba, 0);
    assert_eq!(line[0], 7);
    assert_eq!(
        gba.bus.lcd().backgrounds[0].tile_map().entry_offset(256, 0),
        0x4800
    );
}

#[test]
fn layers_compose_by_priority_then_number() {
    let mut gba = text_bg_machine();
    gba.bus.write_half_word(0x0400_0000, 0x0300).unwrap();
    gba.bus.write_half_word(0x0500_0002, BLUE).unwrap();
    gba.bus.write_half_word(0x0500_0004, GREEN).unwrap();

    // BG0: priority 1, tile 1 -> colour 1.
    gba.bus.write_byte(0x0400_0008, 0x01).unwrap();
    gba.bus.write_half_word(BG0_MAP, 0x0001).unwrap();
    gba.bus.write_byte(0x0600_0020, 0x01).unwrap();
    // BG1: priority 0, tile 2 -> colour 2.
    gba.bus.write_half_word(0x0400_000A, 0x0900).unwrap();
    gba.bus.write_half_word(BG1_MAP, 0x0002).unwrap();
    gba.bus.write_byte(0x0600_0040, 0x02).unwrap();

    gba.render_scanline(0);
    assert_eq!(gba.frame().pixel(0, 0), Color::from_bgr555(GREEN));

    // Equal priority: the lower-numbered background wins.
    gba.bus.write_byte(0x0400_000A, 0x01).unwrap();
    gba.render_scanline(0);
    assert_eq!(gba.frame().pixel(0, 0), Color::from_bgr555(BLUE));
    assert_eq!(gba.frame().pixel(8, 0), Color::from_bgr555(RED));
}

#[test]
fn layers_outside_the_display_mode_are_not_drawn() {
    let mut gba = text_bg_machine();
    gba.bus.write_half_word(0x0500_0002, BLUE).unwrap();
    gba.bus.write_half_word(BG0_MAP, 0x0001).unwrap();
    gba.bus.write_byte(0x0600_0020, 0x01).unwrap();

    // Mode 1 still has BG0 as a text layer.
    gba.bus.write_half_word(0x0400_0000, 0x0101).unwrap();
    gba.render_scanline(0);
    assert_eq!(gba.frame().pixel(0, 0), Color::from_bgr555(BLUE));
    assert!(!gba.bus.lcd().bg_in_mode(3));

    // Mode 2 only has BG2 and BG3.
    gba.bus.write_half_word(0x0400_0000, 0x0102).unwrap();
    gba.render_scanline(0);
    assert_eq!(gba.frame().pixel(0, 0), Color::from_bgr555(RED));
    assert!(!gba.bus.lcd().bg_in_mode(0));
    assert!(gba.bus.lcd().bg_in_mode(3));
}

#[test]
fn forced_blank_draws_white() {
    let mut gba = text_bg_machine();
    gba.bus.write_half_word(0x0400_0000, 0x0180).unwrap();
    gba.render_scanline(5);

    assert_eq!(gba.frame().pixel(0, 5), Color::WHITE);
    assert_eq!(gba.frame().pixel(239, 5), Color::WHITE);
}

#[test]
fn display_mode_selects_affine_layers() {
    let mut gba = machine();
    gba.bus.write_half_word(0x0400_000C, 0x4000).unwrap();

    gba.bus.write_byte(0x0400_0000, 0x01).unwrap();
    assert!(gba.bus.lcd().backgrounds[2].is_affine());
    assert!(!gba.bus.lcd().backgrounds[3].is_affine());
    assert_eq!(gba.bus.lcd().backgrounds[2].size(), BgSize::AffineBg256x256);

    gba.bus.write_byte(0x0400_0000, 0x02).unwrap();
    assert!(gba.bus.lcd().backgrounds[3].is_affine());

    gba.bus.write_byte(0x0400_0000, 0x00).unwrap();
    assert!(!gba.bus.lcd().backgrounds[2].is_affine());
    assert_eq!(gba.bus.lcd().backgrounds[2].size(), BgSize::Bg512x256);
}

#[test]
fn video_frame_copies_rgb24() {
    let mut gba = text_bg_machine();
    gba.render_frame();

    let mut buffer = vec![0u8; crate::SCREEN_WIDTH * crate::SCREEN_HEIGHT * 3];
    gba.video_frame(&mut buffer);
    assert_eq!(&buffer[0..3], &[0xFF, 0x00, 0x00]);
    assert_eq!(&buffer[buffer.len() - 3..], &[0xFF, 0x00, 0x00]);
}

#[test]
fn vblank_interrupt_reaches_the_irq_vector() {
    let mut gba = machine();
    gba.bus.write_byte(0x0400_0004, 0x08).unwrap();
    gba.bus.write_half_word(0x0400_0200, 0x0001).unwrap();
    gba.bus.interrupts_mut().set_master_enable(1);
    gba.cpu.set_pc(0x0800_0108);
    let cpsr = gba.cpu.cpsr();

    gba.render_frame();
    assert!(gba.bus.interrupts().request().contains(Interrupt::VBLANK));

    assert!(gba.process_interrupts());
    assert_eq!(gba.cpu.mode(), CpuMode::Irq);
    assert_eq!(gba.cpu.state(), CpuState::Arm);
    assert_eq!(gba.cpu.pc(), Cpu::IRQ_VECTOR);
    assert_eq!(gba.cpu.lr(), 0x0800_0104);
    assert_eq!(gba.cpu.spsr(CpuMode::Irq), cpsr);
    assert!(gba.cpu.irq_disabled());
    assert!(gba.cpu.flush_pipeline);

    // The request stays pending until acknowledged through IF.
    assert!(gba.bus.interrupts().request().contains(Interrupt::VBLANK));
    assert_eq!(gba.bus.interrupts().master_enable(), 1);
    assert!(!gba.process_interrupts());
}

#[test]
fn irq_from_thumb_links_past_the_halfword() {
    let mut gba = machine();
    gba.bus.write_half_word(0x0400_0200, 0x0002).unwrap();
    gba.bus.interrupts_mut().set_master_enable(1);
    gba.cpu.set_state(CpuState::Thumb);
    gba.cpu.set_pc(0x0800_0108);

    gba.request_interrupt(Interrupt::HBLANK);
    assert!(gba.process_interrupts());
    assert_eq!(gba.cpu.lr(), 0x0800_0106);
    assert_eq!(gba.cpu.state(), CpuState::Arm);
    assert!(gba.cpu.spsr(CpuMode::Irq) & StatusFlag::THUMB.bits() != 0);
}

#[test]
fn masked_interrupts_are_not_taken() {
    let mut gba = machine();
    gba.request_interrupt(Interrupt::VBLANK);

    // IME clear.
    gba.bus.write_half_word(0x0400_0200, 0x0001).unwrap();
    assert!(!gba.process_interrupts());

    // IE does not enable the source.
    gba.bus.interrupts_mut().set_master_enable(1);
    gba.bus.write_half_word(0x0400_0200, 0x0002).unwrap();
    assert!(!gba.process_interrupts());

    // CPSR I flag set.
    gba.bus.write_half_word(0x0400_0200, 0x0001).unwrap();
    gba.cpu.set_irq_disabled(true);
    assert!(!gba.process_interrupts());

    gba.cpu.set_irq_disabled(false);
    assert!(gba.process_interrupts());
}

#[test]
fn vblank_is_not_requested_unless_enabled_in_dispstat() {
    let mut gba = machine();
    gba.render_frame();
    assert!(gba.bus.interrupts().request().is_empty());
}

#[test]
fn swi_enters_supervisor_through_the_bios() {
    let mut gba = machine_with_bios(true);
    gba.cpu.set_pc(0x0800_0108);
    let cpsr = gba.cpu.cpsr();

    assert!(gba.enter_swi(0x05));
    assert_eq!(gba.cpu.mode(), CpuMode::Supervisor);
    assert_eq!(gba.cpu.pc(), Cpu::SWI_VECTOR);
    assert_eq!(gba.cpu.lr(), 0x0800_0104);
    assert_eq!(gba.cpu.spsr(CpuMode::Supervisor), cpsr);

    let mut gba = machine();
    assert!(!gba.enter_swi(0x05));
    assert_eq!(gba.cpu.pc(), Cpu::ROM_ENTRY);
}
