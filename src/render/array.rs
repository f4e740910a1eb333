use crate::{
    decode::Ctx,
    render::primitives::{format_addr, print_addr},
};

/// Renders `count` elements of `elem_size` bytes starting at `addr`.
///
/// `render` prints one fetched element and runs after the separator was
/// emitted. At most `max_strlen` elements are shown. An element that cannot
/// be read ends the array: at the first element the bare address is printed
/// instead, later ones leave `...` and the unread address in a comment
/// after the closing bracket.
///
/// Returns true when at least one element was printed.
pub fn print_array<F>(ctx: &mut Ctx, addr: u64, count: u64, elem_size: usize, mut render: F) -> bool
where
    F: FnMut(&mut Ctx, &[u8]),
{
    if addr == 0 {
        ctx.out.text("NULL");
        return false;
    }
    if count == 0 || elem_size == 0 {
        ctx.out.array_begin();
        ctx.out.array_end();
        return false;
    }
    let word_mask = match ctx.personality().word_size() {
        4 => u32::MAX as u64,
        _ => u64::MAX,
    };
    // a hostile count must not wrap the address space
    let Some(total) = count.checked_mul(elem_size as u64) else {
        print_addr(ctx, addr);
        return false;
    };
    let Some(end) = addr.checked_add(total).filter(|end| *end - 1 <= word_mask) else {
        print_addr(ctx, addr);
        return false;
    };

    let budget = ctx.cfg.max_strlen as u64;
    let mut cursor = addr;
    let mut index = 0u64;
    let mut unread = None;
    while cursor < end {
        if index >= budget {
            if cursor == addr {
                ctx.out.array_begin();
            }
            ctx.out.more_data_follows();
            if !ctx.abbrev() {
                unread = Some(cursor);
            }
            break;
        }
        let Some(element) = ctx.umove(cursor, elem_size) else {
            if cursor == addr {
                print_addr(ctx, addr);
                return false;
            }
            ctx.out.more_data_follows();
            unread = Some(cursor);
            break;
        };
        if cursor == addr {
            ctx.out.array_begin();
        }
        ctx.out.next();
        render(ctx, &element);
        cursor += elem_size as u64;
        index += 1;
    }
    ctx.out.array_end();
    if let Some(cursor) = unread {
        ctx.out.comment(&format_addr(cursor));
    }
    index > 0
}

/// Like `print_array` over elements already copied out of the tracee.
///
/// `count` must already be clamped to what `bytes` holds.
pub fn print_local_array<F>(ctx: &mut Ctx, bytes: &[u8], count: usize, elem_size: usize, mut render: F)
where
    F: FnMut(&mut Ctx, &[u8]),
{
    let elem_size = elem_size.max(1);
    let count = count.min(bytes.len() / elem_size);
    ctx.out.array_begin();
    for (index, element) in bytes.chunks_exact(elem_size).take(count).enumerate() {
        if index >= ctx.cfg.max_strlen {
            ctx.out.more_data_follows();
            break;
        }
        ctx.out.next();
        render(ctx, element);
    }
    ctx.out.array_end();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::Config,
        decode::Env,
        decorator::NoDecoration,
        peeker_poker::MemoryImage,
        personality::Personality,
        printer::Printer,
        render::StructView,
        traced_call::TracedCall,
    };

    const ARRAY: u64 = 0x5000;

    fn words(values: &[u32]) -> Vec<u8> {
        values.iter().flat_map(|value| value.to_ne_bytes()).collect()
    }

    fn render(mem: &MemoryImage, cfg: &Config, addr: u64, count: u64) -> String {
        let env = Env {
            mem,
            deco: &NoDecoration,
            cfg,
        };
        let mut call = TracedCall::new(1, 0, Personality::Native, [0; 6]);
        let mut out = Printer::new();
        let mut ctx = Ctx::new(&mut call, &env, &mut out);
        print_array(&mut ctx, addr, count, 4, |ctx, word| {
            ctx.out.text(&StructView::new(word).u32(0).to_string());
        });
        out.as_str().to_owned()
    }

    #[test]
    fn budget_cuts_the_array() {
        let mem = MemoryImage::new().with(ARRAY, words(&[1, 2, 3, 4]));
        let short = Config {
            max_strlen: 2,
            ..Config::default()
        };
        assert_eq!(render(&mem, &short, ARRAY, 4), "[1, 2, ...]");

        let verbose = Config {
            verbose: true,
            ..short.clone()
        };
        assert_eq!(render(&mem, &verbose, ARRAY, 4), "[1, 2, ...] /* 0x5008 */");

        let nothing = Config {
            max_strlen: 0,
            ..Config::default()
        };
        assert_eq!(render(&mem, &nothing, ARRAY, 4), "[...]");
    }

    #[test]
    fn empty_and_null_arrays() {
        let mem = MemoryImage::new();
        let cfg = Config::default();
        assert_eq!(render(&mem, &cfg, ARRAY, 0), "[]");
        assert_eq!(render(&mem, &cfg, 0, 3), "NULL");
    }

    #[test]
    fn unreadable_elements_end_the_array() {
        let cfg = Config::default();
        assert_eq!(render(&MemoryImage::new(), &cfg, ARRAY, 2), "0x5000");

        let mem = MemoryImage::new().with(ARRAY, words(&[7, 8]));
        assert_eq!(render(&mem, &cfg, ARRAY, 3), "[7, 8, ...] /* 0x5008 */");
    }
}
