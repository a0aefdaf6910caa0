// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut

use super::*;

#[test]
fn test_big_endian_layout() {
    let mut bus = Bus::new();
    bus.write32(0x0000_0000, 0x1234_5678);

    assert_eq!(bus.read8(0x0000_0000), 0x12);
    assert_eq!(bus.read8(0x0000_0003), 0x78);
    assert_eq!(bus.read16(0x0000_0000), 0x1234);
    assert_eq!(bus.read16(0x0000_0002), 0x5678);
}

#[test]
fn test_halfword_write() {
    let mut bus = Bus::new();
    bus.write16(0x0000_0002, 0xBEEF);
    assert_eq!(bus.read32(0x0000_0000), 0x0000_BEEF);
}

#[test]
fn test_unaligned_word_is_byte_composed() {
    let mut bus = Bus::new();
    for (i, byte) in [0x11u8, 0x22, 0x33, 0x44, 0x55, 0x66].iter().enumerate() {
        bus.write8(i as u32, *byte);
    }

    assert_eq!(bus.read32(0x0000_0001), 0x2233_4455);

    bus.write32(0x0000_0011, 0xAABB_CCDD);
    assert_eq!(bus.read8(0x0000_0011), 0xAA);
    assert_eq!(bus.read8(0x0000_0014), 0xDD);
}

#[test]
fn test_fast_and_composed_paths_agree() {
    let mut bus = Bus::new();
    let mut rom = Vec::new();
    for i in 0..64u32 {
        rom.extend_from_slice(&(i.wrapping_mul(0x0101_0101) ^ 0x8000_0001).to_be_bytes());
    }
    bus.load_rom(rom);

    for addr in (0..0x100u32).step_by(4) {
        bus.write32(addr, addr.wrapping_mul(0x9E37_79B9));
    }

    for base in [0x0000_0000u32, 0xA000_0000, 0x1000_0000, 0xB000_0000] {
        for offset in (0..0x100u32).step_by(4) {
            let addr = base + offset;
            let composed = u32::from_be_bytes([
                bus.read8(addr),
                bus.read8(addr + 1),
                bus.read8(addr + 2),
                bus.read8(addr + 3),
            ]);
            assert_eq!(bus.read32(addr), composed, "mismatch at 0x{:08X}", addr);
        }
    }
}

#[test]
fn test_ram_end_boundary() {
    let mut bus = Bus::new();
    bus.write32(0x007F_FFFC, 0x0102_0304);
    assert_eq!(bus.read32(0xA07F_FFFC), 0x0102_0304);

    // Last two bytes fall outside RAM
    bus.write32(0x007F_FFFE, 0xAABB_CCDD);
    assert_eq!(bus.read16(0x007F_FFFE), 0xAABB);
    assert_eq!(bus.read32(0x007F_FFFE), 0xAABB_0000);
}
