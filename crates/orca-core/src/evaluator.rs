//! The per-tick scheduler and the full operator catalogue.
//!
//! Handlers share their context explicitly: every operator method below
//! takes `&mut self` (the `Machine`, which already bundles grid, variables,
//! notes, and sink) plus the coordinates it was dispatched at and, where
//! needed, the host-supplied RNG. Nothing is hidden in process-wide state.

use rand::{Rng, RngCore};

use crate::cell::CellFlags;
use crate::glyph::Glyph;
use crate::machine::Machine;
use crate::notes::{midi_key_for_letter, Note};
use crate::sink::SynthSink;

/// Human-readable name for an operator glyph, for host UIs. `None` for data
/// glyphs and unrecognised bytes.
pub fn operator_name(glyph: Glyph) -> Option<&'static str> {
    Some(match glyph.byte() {
        b'A' => "add",
        b'B' => "subtract",
        b'C' => "clock",
        b'D' => "delay",
        b'E' => "east",
        b'F' => "if",
        b'G' => "generator",
        b'H' => "halt",
        b'I' => "increment",
        b'J' => "jumper",
        b'K' => "konkat",
        b'L' => "less",
        b'M' => "multiply",
        b'N' => "north",
        b'O' => "read",
        b'P' => "push",
        b'Q' => "query",
        b'R' => "random",
        b'S' => "south",
        b'T' => "track",
        b'U' => "uclid",
        b'V' => "variable",
        b'W' => "west",
        b'X' => "write",
        b'Y' => "jymper",
        b'Z' => "lerp",
        b'*' => "bang",
        b'#' => "comment",
        b':' => "midi",
        b'%' => "mono",
        b'!' | b'?' | b';' | b'=' | b'$' => "reserved",
        _ => return None,
    })
}

/// Run one full tick of `machine`: clear flags, age notes, then scan and
/// dispatch the grid once in row-major order.
pub fn run_tick<S: SynthSink>(machine: &mut Machine<S>, rng: &mut dyn RngCore) {
    machine.grid.clear_flags();
    machine.notes.age(&mut machine.sink);
    machine.bump_ticks();

    let width = machine.grid.width() as i64;
    let height = machine.grid.height() as i64;

    for y in 0..height {
        for x in 0..width {
            let ticked = machine
                .grid
                .cell(x, y)
                .map(|c| c.flags().contains(CellFlags::TICKED))
                .unwrap_or(true);
            if ticked {
                continue;
            }

            let stored = machine.grid.peek(x, y);
            let banged = machine
                .grid
                .cell(x, y)
                .map(|c| c.flags().contains(CellFlags::BANGED))
                .unwrap_or(false);
            let effective = if banged { stored.as_upper() } else { stored };

            let locked = machine
                .grid
                .cell(x, y)
                .map(|c| c.flags().contains(CellFlags::LOCKED))
                .unwrap_or(false);
            let inert = effective.is_empty()
                || effective.is_lowercase_letter()
                || effective.byte().is_ascii_digit()
                || (locked && effective.byte() != b'*');
            if inert {
                continue;
            }

            dispatch(machine, effective, x, y, rng);
        }
    }
}

/// Evaluate `effective` at `(x, y)`. Guarded independently of the caller's
/// own `TICKED` check: the bang operator re-enters this function directly
/// for its north/west neighbours, bypassing the main scan's lock check but
/// still respecting this guard, so a cell cannot fire twice in one tick.
fn dispatch<S: SynthSink>(machine: &mut Machine<S>, effective: Glyph, x: i64, y: i64, rng: &mut dyn RngCore) {
    let already_ticked = machine
        .grid
        .cell(x, y)
        .map(|c| c.flags().contains(CellFlags::TICKED))
        .unwrap_or(true);
    if already_ticked {
        return;
    }
    machine.grid.mark_ticked(x, y);
    if let Some(name) = operator_name(effective) {
        if let Some(cell) = machine.grid.cell_mut(x, y) {
            cell.desc = name;
        }
    }

    match effective.byte() {
        b'A' => op_add(machine, x, y),
        b'B' => op_subtract(machine, x, y),
        b'C' => op_clock(machine, x, y),
        b'D' => op_delay(machine, x, y),
        b'E' => op_move(machine, x, y, 1, 0),
        b'W' => op_move(machine, x, y, -1, 0),
        b'N' => op_move(machine, x, y, 0, -1),
        b'S' => op_move(machine, x, y, 0, 1),
        b'F' => op_if(machine, x, y),
        b'G' => op_generator(machine, x, y),
        b'H' => op_halt(machine, x, y),
        b'I' => op_increment(machine, x, y),
        b'J' => op_jumper(machine, x, y),
        b'K' => op_konkat(machine, x, y),
        b'L' => op_less(machine, x, y),
        b'M' => op_multiply(machine, x, y),
        b'O' => op_read(machine, x, y),
        b'P' => op_push(machine, x, y),
        b'Q' => op_query(machine, x, y),
        b'R' => op_random(machine, x, y, rng),
        b'T' => op_track(machine, x, y),
        b'U' => {}
        b'V' => op_variable(machine, x, y),
        b'X' => op_write(machine, x, y),
        b'Y' => op_jymper(machine, x, y),
        b'Z' => op_lerp(machine, x, y),
        b'*' => op_bang(machine, x, y, rng),
        b'#' => op_comment(machine, x, y),
        b':' => op_midi(machine, x, y, false),
        b'%' => op_midi(machine, x, y, true),
        // reserved sigils (! ? ; = $) and any other glyph: lockable, inert.
        _ => {}
    }
}

fn op_add<S: SynthSink>(m: &mut Machine<S>, x: i64, y: i64) {
    let l = m.grid.read(x - 1, y).to_int(0);
    let r = m.grid.read_locked(x + 1, y);
    let result = Glyph::from_int(l + r.to_int(0), r.is_upper());
    m.grid.write_locked(x, y + 1, result, "A-output");
}

fn op_subtract<S: SynthSink>(m: &mut Machine<S>, x: i64, y: i64) {
    let l = m.grid.read(x - 1, y).to_int(0);
    let r = m.grid.read_locked(x + 1, y);
    let result = Glyph::from_int((l - r.to_int(0)).abs(), r.is_upper());
    m.grid.write_locked(x, y + 1, result, "B-output");
}

fn op_clock<S: SynthSink>(m: &mut Machine<S>, x: i64, y: i64) {
    let rate = m.grid.read(x - 1, y).to_int(1).max(1);
    let modc = m.grid.read_locked(x + 1, y);
    let modv = modc.to_int(10);
    if modv < 2 {
        m.grid.write_locked(x, y + 1, Glyph::new(b'0').unwrap(), "C-output");
        return;
    }
    let prev = m.grid.peek(x, y + 1).to_int(0);
    let result = if m.ticks() % rate as u64 == 0 {
        (prev + 1).rem_euclid(modv)
    } else {
        prev
    };
    m.grid.write_locked(x, y + 1, Glyph::from_int(result, modc.is_upper()), "C-output");
}

fn op_delay<S: SynthSink>(m: &mut Machine<S>, x: i64, y: i64) {
    let rate = m.grid.read(x - 1, y).to_int(1).max(1);
    let modv = m.grid.read_locked(x + 1, y).to_int(8);
    let bang = modv != 0 && (modv == 1 || m.ticks() % (rate as u64 * modv as u64) == 0);
    let out = if bang { b'*' } else { b'.' };
    m.grid.write_locked(x, y + 1, Glyph::new(out).unwrap(), "D-output");
}

fn op_move<S: SynthSink>(m: &mut Machine<S>, x: i64, y: i64, dx: i64, dy: i64) {
    let (dest_x, dest_y) = (x + dx, y + dy);
    if m.grid.in_bounds_pub(dest_x, dest_y) && m.grid.peek(dest_x, dest_y).is_empty() {
        let glyph = m.grid.peek(x, y);
        m.grid.set_glyph(dest_x, dest_y, glyph);
        m.grid.mark_ticked(dest_x, dest_y);
        m.grid.set_glyph(x, y, Glyph::EMPTY);
    } else {
        m.grid.set_glyph(x, y, Glyph::new(b'*').unwrap());
    }
}

fn op_if<S: SynthSink>(m: &mut Machine<S>, x: i64, y: i64) {
    let l = m.grid.read(x - 1, y);
    let r = m.grid.read_locked(x + 1, y);
    let out = if l.byte() == r.byte() { b'*' } else { b'.' };
    m.grid.write_locked(x, y + 1, Glyph::new(out).unwrap(), "F-output");
}

fn op_generator<S: SynthSink>(m: &mut Machine<S>, x: i64, y: i64) {
    let gx = m.grid.read(x - 3, y).to_int(0);
    let gy = m.grid.read(x - 2, y).to_int(0);
    let len = m.grid.read(x - 1, y).to_int(1).max(1);
    for i in 0..len {
        let value = m.grid.read_locked(x + 1 + i, y);
        m.grid.write_locked(x + gx + i, y + gy + 1, value, "G-output");
    }
}

fn op_halt<S: SynthSink>(m: &mut Machine<S>, x: i64, y: i64) {
    m.grid.lock(x, y + 1);
}

fn op_increment<S: SynthSink>(m: &mut Machine<S>, x: i64, y: i64) {
    let step = m.grid.read(x - 1, y).to_int(1);
    let modc = m.grid.read_locked(x + 1, y);
    let mut modv = modc.to_int(10);
    if modv < 1 {
        modv = 10;
    }
    let prev = m.grid.peek(x, y + 1).to_int(0);
    let result = (prev + step).rem_euclid(modv);
    m.grid.write_locked(x, y + 1, Glyph::from_int(result, modc.is_upper()), "I-output");
}

fn op_jumper<S: SynthSink>(m: &mut Machine<S>, x: i64, y: i64) {
    let value = m.grid.read(x, y - 1);
    m.grid.write_locked(x, y + 1, value, "J-output");
}

fn op_konkat<S: SynthSink>(m: &mut Machine<S>, x: i64, y: i64) {
    let len = m.grid.read(x - 1, y).to_int(1).max(1);
    for i in 0..len {
        let name = m.grid.read_locked(x + 1 + i, y);
        let value = if name.is_empty() { Glyph::EMPTY } else { m.variables.get(name) };
        m.grid.write_locked(x + 1 + i, y + 1, value, "K-output");
    }
}

fn op_less<S: SynthSink>(m: &mut Machine<S>, x: i64, y: i64) {
    let l = m.grid.read(x - 1, y);
    let r = m.grid.read_locked(x + 1, y);
    let lesser = if l.as_lower().byte() < r.as_lower().byte() { l } else { r };
    let cased = if r.is_upper() { lesser.as_upper() } else { lesser.as_lower() };
    m.grid.write_locked(x, y + 1, cased, "L-output");
}

fn op_multiply<S: SynthSink>(m: &mut Machine<S>, x: i64, y: i64) {
    let l = m.grid.read(x - 1, y).to_int(0);
    let r = m.grid.read_locked(x + 1, y);
    let result = Glyph::from_int(l * r.to_int(0), r.is_upper());
    m.grid.write_locked(x, y + 1, result, "M-output");
}

fn op_read<S: SynthSink>(m: &mut Machine<S>, x: i64, y: i64) {
    let rx = m.grid.read(x - 2, y).to_int(0);
    let ry = m.grid.read(x - 1, y).to_int(0);
    let value = m.grid.read_locked(x + 1 + rx, y + ry);
    m.grid.write_locked(x, y + 1, value, "O-output");
}

fn op_push<S: SynthSink>(m: &mut Machine<S>, x: i64, y: i64) {
    let key = m.grid.read(x - 2, y).to_int(0);
    let len = m.grid.read(x - 1, y).to_int(1).max(1);
    let value = m.grid.read_locked(x + 1, y);
    for i in 0..len {
        m.grid.lock(x + i, y + 1);
    }
    let slot = key.rem_euclid(len);
    m.grid.write_locked(x + slot, y + 1, value, "P-output");
}

fn op_query<S: SynthSink>(m: &mut Machine<S>, x: i64, y: i64) {
    let gx = m.grid.read(x - 3, y).to_int(0);
    let gy = m.grid.read(x - 2, y).to_int(0);
    let len = m.grid.read(x - 1, y).to_int(1).max(1);
    for i in 0..len {
        let value = m.grid.read_locked(x + gx + i + 1, y + gy);
        m.grid.write_locked(x + i - len + 1, y + 1, value, "Q-output");
    }
}

fn op_random<S: SynthSink>(m: &mut Machine<S>, x: i64, y: i64, rng: &mut dyn RngCore) {
    let min_c = m.grid.read(x - 1, y).to_int(0);
    let max_c = m.grid.read_locked(x + 1, y);
    let max_v = max_c.to_int(35);
    let (lo, hi) = if min_c <= max_v { (min_c, max_v) } else { (max_v, min_c) };
    let value = rng.gen_range(lo..=hi);
    m.grid.write_locked(x, y + 1, Glyph::from_int(value, max_c.is_upper()), "R-output");
}

fn op_track<S: SynthSink>(m: &mut Machine<S>, x: i64, y: i64) {
    let key = m.grid.read(x - 2, y).to_int(0);
    let len = m.grid.read(x - 1, y).to_int(1).max(1);
    let slot = key.rem_euclid(len);
    let value = m.grid.read_locked(x + 1 + slot, y);
    for i in 0..len {
        m.grid.lock(x + 1 + i, y);
    }
    m.grid.write_locked(x, y + 1, value, "T-output");
}

fn op_variable<S: SynthSink>(m: &mut Machine<S>, x: i64, y: i64) {
    let write_name = m.grid.read(x - 1, y);
    let read_name = m.grid.read_locked(x + 1, y);
    if !write_name.is_empty() {
        m.variables.set(write_name, read_name);
    } else if !read_name.is_empty() {
        let value = m.variables.get(read_name);
        m.grid.write_locked(x, y + 1, value, "V-output");
    }
}

fn op_write<S: SynthSink>(m: &mut Machine<S>, x: i64, y: i64) {
    let wx = m.grid.read(x - 2, y).to_int(0);
    let wy = m.grid.read(x - 1, y).to_int(0);
    let value = m.grid.read_locked(x + 1, y);
    m.grid.write_locked(x + wx, y + wy + 1, value, "X-output");
}

fn op_jymper<S: SynthSink>(m: &mut Machine<S>, x: i64, y: i64) {
    let value = m.grid.read(x - 1, y);
    m.grid.write_locked(x + 1, y, value, "Y-output");
}

fn op_lerp<S: SynthSink>(m: &mut Machine<S>, x: i64, y: i64) {
    let rate = m.grid.read(x - 1, y).to_int(1);
    let target_c = m.grid.read_locked(x + 1, y);
    let target = target_c.to_int(0);
    let prev = m.grid.peek(x, y + 1).to_int(0);
    let result = if prev > target {
        (prev - rate).max(target)
    } else if prev < target {
        (prev + rate).min(target)
    } else {
        prev
    };
    m.grid.write_locked(x, y + 1, Glyph::from_int(result, target_c.is_upper()), "Z-output");
}

fn op_bang<S: SynthSink>(m: &mut Machine<S>, x: i64, y: i64, rng: &mut dyn RngCore) {
    let locked = m
        .grid
        .cell(x, y)
        .map(|c| c.flags().contains(CellFlags::LOCKED))
        .unwrap_or(false);
    if !locked {
        m.grid.set_glyph(x, y, Glyph::EMPTY);
    }

    // North and west are re-dispatched immediately so their operator fires
    // this tick even if the scan hasn't reached them yet. South and east
    // are only marked BANGED and fire naturally when the scan arrives.
    let (nx, ny) = (x, y - 1);
    if m.grid.in_bounds_pub(nx, ny) {
        m.grid.mark_banged(nx, ny);
        let effective = m.grid.peek(nx, ny).as_upper();
        dispatch(m, effective, nx, ny, rng);
    }
    let (wx, wy) = (x - 1, y);
    if m.grid.in_bounds_pub(wx, wy) {
        m.grid.mark_banged(wx, wy);
        let effective = m.grid.peek(wx, wy).as_upper();
        dispatch(m, effective, wx, wy, rng);
    }
    let (sx, sy) = (x, y + 1);
    if m.grid.in_bounds_pub(sx, sy) {
        m.grid.mark_banged(sx, sy);
    }
    let (ex, ey) = (x + 1, y);
    if m.grid.in_bounds_pub(ex, ey) {
        m.grid.mark_banged(ex, ey);
    }
}

fn op_comment<S: SynthSink>(m: &mut Machine<S>, x: i64, y: i64) {
    let width = m.grid.width() as i64;
    let mut cx = x;
    while cx < width {
        let glyph = m.grid.peek(cx, y);
        m.grid.mark_ticked(cx, y);
        m.grid.lock(cx, y);
        if cx > x && glyph.byte() == b'#' {
            break;
        }
        cx += 1;
    }
}

fn op_midi<S: SynthSink>(m: &mut Machine<S>, x: i64, y: i64, mono: bool) {
    let banged = m
        .grid
        .cell(x, y)
        .map(|c| c.flags().contains(CellFlags::BANGED))
        .unwrap_or(false);

    let channel_g = m.grid.read_locked(x + 1, y);
    let octave_g = m.grid.read_locked(x + 2, y);
    let note_g = m.grid.read_locked(x + 3, y);
    let velocity_g = m.grid.read_locked(x + 4, y);
    let length_g = m.grid.read_locked(x + 5, y);

    if !banged {
        return;
    }

    let channel = channel_g.to_int(0).clamp(0, 15) as u8;
    let octave = octave_g.to_int(0);
    let key = match midi_key_for_letter(note_g, octave) {
        Some(key) => key,
        None => return,
    };
    let velocity = velocity_g.to_int(15) as f32 / 16.0;
    let length = length_g.to_int(1).max(1) as u32;

    let note = Note {
        channel,
        key,
        velocity,
        remaining_length: length,
    };

    if mono {
        m.notes.silence_channel(channel, &mut m.sink);
    }
    m.notes.push(note, &mut m.sink);
    if mono {
        m.sink.set_pan(channel, m.ticks() % 2 == 0);
    }
}
