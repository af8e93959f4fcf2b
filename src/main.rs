use dotmatrix::Machine;

/// A small in-memory program: sum two constants, park the CPU.
fn build_demo_rom() -> Vec<u8> {
    let mut rom = vec![0u8; 0x0100];
    let program: &[u8] = &[
        0x3E, 0x05, // LD A,0x05
        0xC6, 0x03, // ADD A,0x03
        0xEA, 0x00, 0xC0, // LD (0xC000),A
        0x10, 0x00, // STOP
    ];
    rom.extend_from_slice(program);
    rom
}

fn main() {
    let mut machine = Machine::new();

    // A ROM path on the command line wins over the built-in demo.
    let rom_arg = std::env::args().nth(1);
    match &rom_arg {
        Some(path) => machine.load_rom_file(path).expect("failed to load ROM"),
        None => machine.load_rom(&build_demo_rom()).expect("demo ROM fits"),
    }

    // Run until the machine parks itself or one frame completes.
    let mut steps: usize = 0;
    let max_steps = 1_000_000;
    while !machine.cpu.state().stopped() {
        machine.step().expect("step failed");
        if machine.bus.ppu.take_frame_complete() {
            break;
        }
        steps += 1;
        if steps >= max_steps {
            break;
        }
    }

    let state = machine.cpu.state();
    println!("AF: 0x{:04X}", state.regs.af.word());
    println!("BC: 0x{:04X}", state.regs.bc.word());
    println!("DE: 0x{:04X}", state.regs.de.word());
    println!("HL: 0x{:04X}", state.regs.hl.word());
    println!("SP: 0x{:04X}", state.sp);
    println!("PC: 0x{:04X}", state.pc);
    println!("mem[0xC000]: 0x{:02X}", machine.bus.read(0xC000));
    println!("elapsed: {} t-cycles", machine.bus.clock.t_cycles());
}
