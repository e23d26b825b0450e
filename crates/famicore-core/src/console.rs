//! The console: every component wired together and clocked.
//!
//! One master tick clocks the PPU; every third tick the CPU runs, unless
//! an OAM DMA transfer has claimed its slot; an NMI raised by the PPU
//! during the tick is handed to the CPU on the same tick. Frames pace at
//! 60 Hz through a residual-time accumulator.

use std::cell::{Ref, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use log::{debug, info};

use famicore_cpu::Cpu;
use famicore_mappers::Cartridge;
use famicore_ppu::{Ppu, VideoSink, FRAME_HEIGHT, FRAME_WIDTH};

use crate::bus::{AddressRange, Bus, BusError};
use crate::devices::{CartridgeConnector, DmaPort, PpuRegisters};
use crate::dma::{DmaController, DmaError};
use crate::input::{Controller, ControllerPort};
use crate::ram::{Ram, RamError};

/// Seconds per frame at the nominal 60 Hz refresh.
const FRAME_PERIOD: f64 = 1.0 / 60.0;

/// Work RAM backing size.
const RAM_SIZE: usize = 2048;
/// Work RAM window (2 KiB mirrored four times).
const RAM_RANGE: AddressRange = AddressRange::new(0x0000, 0x1FFF);
/// PPU register window.
const PPU_RANGE: AddressRange = AddressRange::new(0x2000, 0x3FFF);
/// OAM DMA trigger register.
const DMA_RANGE: AddressRange = AddressRange::new(0x4014, 0x4014);
/// First controller port.
const CONTROLLER_1_RANGE: AddressRange = AddressRange::new(0x4016, 0x4016);
/// Second controller port.
const CONTROLLER_2_RANGE: AddressRange = AddressRange::new(0x4017, 0x4017);
/// Cartridge expansion window.
const CARTRIDGE_RANGE: AddressRange = AddressRange::new(0x4020, 0xFFFF);

/// Audio output hook. The core produces no samples itself; the sink
/// exists so hosts can wire one ahead of an APU.
pub trait AudioSink {
    /// Queue one sample.
    fn queue_sample(&mut self, sample: f32);
}

/// Errors raised while assembling a console.
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    /// A device could not be attached to the bus.
    #[error(transparent)]
    Bus(#[from] BusError),

    /// The work RAM configuration was rejected.
    #[error(transparent)]
    Ram(#[from] RamError),
}

/// The whole machine.
pub struct Console {
    cpu: Cpu,
    cpu_bus: Rc<RefCell<Bus>>,
    ppu: Rc<RefCell<Ppu>>,
    dma: Rc<RefCell<DmaController>>,
    ports: [Rc<RefCell<ControllerPort>>; 2],
    connector: Rc<RefCell<CartridgeConnector>>,
    cartridge: Option<Rc<RefCell<Cartridge>>>,
    video: Box<dyn VideoSink>,
    audio: Option<Box<dyn AudioSink>>,
    clock_count: u64,
    residual_time: f64,
}

impl Console {
    /// Build a console around a video sink. Devices are attached to the
    /// bus first, then the DMA endpoints are wired last.
    pub fn new(mut video: Box<dyn VideoSink>) -> Result<Self, ConsoleError> {
        let ram = Rc::new(RefCell::new(Ram::new(RAM_SIZE, RAM_RANGE)?));
        let ppu = Rc::new(RefCell::new(Ppu::new()));
        let dma = Rc::new(RefCell::new(DmaController::new()));
        let ports = [
            Rc::new(RefCell::new(ControllerPort::new())),
            Rc::new(RefCell::new(ControllerPort::new())),
        ];
        let connector = Rc::new(RefCell::new(CartridgeConnector::new()));

        let mut bus = Bus::new();
        bus.attach(RAM_RANGE, ram)?;
        bus.attach(
            PPU_RANGE,
            Rc::new(RefCell::new(PpuRegisters::new(ppu.clone()))),
        )?;
        bus.attach(DMA_RANGE, Rc::new(RefCell::new(DmaPort::new(dma.clone()))))?;
        bus.attach(CONTROLLER_1_RANGE, ports[0].clone())?;
        bus.attach(CONTROLLER_2_RANGE, ports[1].clone())?;
        bus.attach(CARTRIDGE_RANGE, connector.clone())?;
        let cpu_bus = Rc::new(RefCell::new(bus));

        dma.borrow_mut().connect_read_source(cpu_bus.clone());
        dma.borrow_mut().connect_write_target(ppu.clone());

        video.set_resolution(FRAME_WIDTH, FRAME_HEIGHT);

        Ok(Self {
            cpu: Cpu::new(),
            cpu_bus,
            ppu,
            dma,
            ports,
            connector,
            cartridge: None,
            video,
            audio: None,
            clock_count: 0,
            residual_time: 0.0,
        })
    }

    /// Seat a cartridge. The connector and the PPU both follow the new
    /// cartridge immediately, mirroring mode included.
    pub fn insert_cartridge(&mut self, cartridge: Cartridge) {
        info!("cartridge inserted");
        let cartridge = Rc::new(RefCell::new(cartridge));
        self.connector.borrow_mut().insert(cartridge.clone());
        self.ppu.borrow_mut().connect_cartridge(cartridge.clone());
        self.cartridge = Some(cartridge);
    }

    /// Plug a controller into port 0 or 1. Other indices are ignored.
    pub fn plug_controller(&mut self, port: usize, controller: Rc<RefCell<dyn Controller>>) {
        if let Some(slot) = self.ports.get(port) {
            slot.borrow_mut().plug(controller);
        }
    }

    /// Remove the controller from a port.
    pub fn unplug_controller(&mut self, port: usize) {
        if let Some(slot) = self.ports.get(port) {
            slot.borrow_mut().unplug();
        }
    }

    /// Connect the audio hook.
    pub fn connect_audio_sink(&mut self, sink: Box<dyn AudioSink>) {
        self.audio = Some(sink);
    }

    /// The connected audio hook, if any.
    pub fn audio_sink_mut(&mut self) -> Option<&mut (dyn AudioSink + '_)> {
        if let Some(sink) = self.audio.as_mut() {
            Some(&mut **sink)
        } else {
            None
        }
    }

    /// One master tick.
    pub fn clock(&mut self) -> Result<(), DmaError> {
        self.ppu.borrow_mut().clock(self.video.as_mut());

        if self.clock_count % 3 == 0 {
            let dma_active = self.dma.borrow().is_transferring();
            if dma_active {
                self.dma.borrow_mut().clock(self.clock_count)?;
            } else {
                self.cpu.clock(&mut *self.cpu_bus.borrow_mut());
            }
        }

        if self.ppu.borrow_mut().take_nmi() {
            self.cpu.nmi(&mut *self.cpu_bus.borrow_mut());
        }

        self.clock_count = self.clock_count.wrapping_add(1);
        Ok(())
    }

    /// Real-time pacing: burn down the residual accumulator, then run
    /// exactly one frame when it expires.
    pub fn update(&mut self, elapsed_seconds: f64) -> Result<(), DmaError> {
        if self.residual_time > 0.0 {
            self.residual_time -= elapsed_seconds;
            return Ok(());
        }
        self.residual_time += FRAME_PERIOD - elapsed_seconds;
        loop {
            self.clock()?;
            if self.ppu.borrow_mut().take_frame_complete() {
                break;
            }
        }
        Ok(())
    }

    /// Run master ticks until one CPU instruction has retired and the
    /// next has begun.
    pub fn advance_instruction(&mut self) -> Result<(), DmaError> {
        loop {
            self.clock()?;
            if self.cpu.is_instruction_complete() {
                break;
            }
        }
        loop {
            self.clock()?;
            if !self.cpu.is_instruction_complete() {
                break;
            }
        }
        Ok(())
    }

    /// Run master ticks until the frame completes, then finish the
    /// instruction in flight.
    pub fn advance_frame(&mut self) -> Result<(), DmaError> {
        loop {
            self.clock()?;
            if self.ppu.borrow_mut().take_frame_complete() {
                break;
            }
        }
        while !self.cpu.is_instruction_complete() {
            self.clock()?;
        }
        Ok(())
    }

    /// Reset the machine: clocks zeroed, CPU and cartridge re-initialized,
    /// video parameters re-asserted.
    pub fn reset(&mut self) {
        debug!("console reset");
        if let Some(cartridge) = &self.cartridge {
            cartridge.borrow_mut().reset();
        }
        self.ppu.borrow_mut().reset();
        self.dma.borrow_mut().reset();
        self.cpu.reset(&mut *self.cpu_bus.borrow_mut());
        self.clock_count = 0;
        self.residual_time = 0.0;
        self.video.set_resolution(FRAME_WIDTH, FRAME_HEIGHT);
    }

    /// CPU state view.
    #[must_use]
    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    /// PPU state view.
    #[must_use]
    pub fn ppu(&self) -> Ref<'_, Ppu> {
        self.ppu.borrow()
    }

    /// Master ticks since reset.
    #[must_use]
    pub fn clock_count(&self) -> u64 {
        self.clock_count
    }

    /// True while an OAM DMA transfer occupies the CPU slot.
    #[must_use]
    pub fn is_dma_transferring(&self) -> bool {
        self.dma.borrow().is_transferring()
    }

    /// Read through the CPU bus (same routing as a CPU or DMA read).
    #[must_use]
    pub fn bus_read(&self, addr: u16) -> u8 {
        self.cpu_bus.borrow().read(addr)
    }

    /// Write through the CPU bus.
    pub fn bus_write(&self, addr: u16, value: u8) {
        self.cpu_bus.borrow().write(addr, value);
    }

    /// Disassemble `[start, stop]` through the CPU bus.
    #[must_use]
    pub fn disassemble(&self, start: u16, stop: u16) -> BTreeMap<u16, String> {
        famicore_cpu::disassemble(&mut *self.cpu_bus.borrow_mut(), start, stop)
    }
}
