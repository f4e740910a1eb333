// Video4Linux2 ioctls
//
// struct v4l2_format keeps its union 8-byte aligned on 64-bit ABIs, so the
// format starts at offset 8 there and at offset 4 on i386. the request
// codes carry the structure size and differ between the two as well.

use crate::{
    decode::{ioctl::IoctlStatus, Ctx},
    render::{
        flags::{print_flags, print_xval},
        primitives::{print_addr, print_int_ptr},
        strings::format_local_cstring,
        StructView,
    },
    xlat::{format_hex, v4l2::*, XlatStyle},
};

const V4L2_CAPABILITY_SIZE: usize = 104;
const V4L2_FMTDESC_SIZE: usize = 64;
const V4L2_REQUESTBUFFERS_SIZE: usize = 20;
const V4L2_CONTROL_SIZE: usize = 8;
const V4L2_PIX_FORMAT_SIZE: usize = 28;

const V4L2_CAP_DEVICE_CAPS: u64 = 0x8000_0000;

/// `v4l2_fourcc('Y', 'U', 'Y', 'V')`
pub fn format_fourcc(fourcc: u32, style: XlatStyle) -> String {
    if style == XlatStyle::Raw {
        return format_hex(fourcc as u64);
    }
    let chars = fourcc
        .to_le_bytes()
        .iter()
        .map(|byte| match byte {
            b'\'' => "'\\''".to_owned(),
            b'\\' => "'\\\\'".to_owned(),
            0x20..=0x7e => format!("'{}'", *byte as char),
            _ => format!("'\\x{byte:02x}'"),
        })
        .collect::<Vec<_>>()
        .join(", ");
    let symbolic = format!("v4l2_fourcc({chars})");
    match style {
        XlatStyle::Verbose => format!("{} /* {symbolic} */", format_hex(fourcc as u64)),
        _ => symbolic,
    }
}

/// `KERNEL_VERSION(5, 15, 0)`
pub fn format_kernel_version(version: u32) -> String {
    format!(
        "KERNEL_VERSION({}, {}, {})",
        version >> 16,
        (version >> 8) & 0xff,
        version & 0xff
    )
}

fn print_fourcc(ctx: &mut Ctx, fourcc: u32) {
    let rendered = format_fourcc(fourcc, ctx.style());
    ctx.out.text(&rendered);
}

fn print_buf_type(ctx: &mut Ctx, ty: u64) {
    print_xval(ctx, &V4L2_BUF_TYPES, ty, "V4L2_BUF_TYPE_???");
}

fn print_querycap(ctx: &mut Ctx, addr: u64) -> IoctlStatus {
    if ctx.entering() {
        return IoctlStatus::MoreAtExit;
    }
    ctx.out.next();
    if ctx.syserror() {
        print_addr(ctx, addr);
        return IoctlStatus::Done;
    }
    let Some(buf) = ctx.umove_or_printaddr(addr, V4L2_CAPABILITY_SIZE) else {
        return IoctlStatus::Done;
    };
    let caps = StructView::new(&buf);
    let capabilities = caps.u32(84) as u64;
    ctx.out.struct_begin();
    ctx.out.field("driver");
    ctx.out.text(&format_local_cstring(caps.bytes(0, 16)));
    ctx.out.field("card");
    ctx.out.text(&format_local_cstring(caps.bytes(16, 32)));
    ctx.out.field("bus_info");
    ctx.out.text(&format_local_cstring(caps.bytes(48, 32)));
    ctx.out.field("version");
    ctx.out.text(&format_kernel_version(caps.u32(80)));
    ctx.out.field("capabilities");
    print_flags(ctx, &V4L2_DEVICE_CAPABILITIES_FLAGS, capabilities, "V4L2_CAP_???");
    if capabilities & V4L2_CAP_DEVICE_CAPS != 0 {
        ctx.out.field("device_caps");
        print_flags(ctx, &V4L2_DEVICE_CAPABILITIES_FLAGS, caps.u32(88) as u64, "V4L2_CAP_???");
    }
    ctx.out.struct_end();
    IoctlStatus::Done
}

fn print_enum_fmt(ctx: &mut Ctx, addr: u64) -> IoctlStatus {
    if ctx.entering() {
        ctx.out.next();
        let Some(buf) = ctx.umove_or_printaddr(addr, V4L2_FMTDESC_SIZE) else {
            return IoctlStatus::Done;
        };
        let desc = StructView::new(&buf);
        ctx.out.struct_begin();
        ctx.out.field("index");
        ctx.out.text(&desc.u32(0).to_string());
        ctx.out.field("type");
        print_buf_type(ctx, desc.u32(4) as u64);
        return IoctlStatus::MoreAtExit;
    }
    if !ctx.syserror() {
        if let Some(buf) = ctx.umove(addr, V4L2_FMTDESC_SIZE) {
            let desc = StructView::new(&buf);
            ctx.out.field("flags");
            print_flags(ctx, &V4L2_FORMAT_DESCRIPTION_FLAGS, desc.u32(8) as u64, "V4L2_FMT_FLAG_???");
            ctx.out.field("description");
            ctx.out.text(&format_local_cstring(desc.bytes(12, 32)));
            ctx.out.field("pixelformat");
            print_fourcc(ctx, desc.u32(44));
        }
    }
    ctx.out.struct_end();
    IoctlStatus::Done
}

fn has_pix_format(ty: u64) -> bool {
    matches!(ty, V4L2_BUF_TYPE_VIDEO_CAPTURE | V4L2_BUF_TYPE_VIDEO_OUTPUT)
}

/// `struct v4l2_pix_format`, the single-planar video member of the union
fn print_pix_format(ctx: &mut Ctx, pix: StructView) {
    ctx.out.struct_begin();
    ctx.out.field("width");
    ctx.out.text(&pix.u32(0).to_string());
    ctx.out.field("height");
    ctx.out.text(&pix.u32(4).to_string());
    ctx.out.field("pixelformat");
    print_fourcc(ctx, pix.u32(8));
    ctx.out.field("field");
    print_xval(ctx, &V4L2_FIELDS, pix.u32(12) as u64, "V4L2_FIELD_???");
    ctx.out.field("bytesperline");
    ctx.out.text(&pix.u32(16).to_string());
    ctx.out.field("sizeimage");
    ctx.out.text(&pix.u32(20).to_string());
    ctx.out.field("colorspace");
    print_xval(ctx, &V4L2_COLORSPACES, pix.u32(24) as u64, "V4L2_COLORSPACE_???");
    ctx.out.struct_end();
}

/// G_FMT fills the format in at exit, S_FMT and TRY_FMT pass one in and
/// get the adjusted one back.
fn print_format(ctx: &mut Ctx, addr: u64, get: bool) -> IoctlStatus {
    let fmt_offset = if ctx.personality().word_size() == 8 { 8 } else { 4 };
    let size = fmt_offset + V4L2_PIX_FORMAT_SIZE;
    if ctx.entering() {
        ctx.out.next();
        let Some(buf) = ctx.umove_or_printaddr(addr, size) else {
            return IoctlStatus::Done;
        };
        let format = StructView::new(&buf);
        let ty = format.u32(0) as u64;
        ctx.out.struct_begin();
        ctx.out.field("type");
        print_buf_type(ctx, ty);
        if !get && has_pix_format(ty) {
            ctx.out.field("fmt.pix");
            print_pix_format(ctx, format.sub(fmt_offset));
        }
        return IoctlStatus::MoreAtExit;
    }
    if !ctx.syserror() {
        if let Some(buf) = ctx.umove(addr, size) {
            let format = StructView::new(&buf);
            if has_pix_format(format.u32(0) as u64) {
                if get {
                    ctx.out.field("fmt.pix");
                } else {
                    ctx.out.value_changed();
                }
                print_pix_format(ctx, format.sub(fmt_offset));
            }
        }
    }
    ctx.out.struct_end();
    IoctlStatus::Done
}

fn print_reqbufs(ctx: &mut Ctx, addr: u64) -> IoctlStatus {
    if ctx.entering() {
        ctx.out.next();
        let Some(buf) = ctx.umove_or_printaddr(addr, V4L2_REQUESTBUFFERS_SIZE) else {
            return IoctlStatus::Done;
        };
        let request = StructView::new(&buf);
        ctx.out.struct_begin();
        ctx.out.field("type");
        print_buf_type(ctx, request.u32(4) as u64);
        ctx.out.field("memory");
        print_xval(ctx, &V4L2_MEMORIES, request.u32(8) as u64, "V4L2_MEMORY_???");
        ctx.out.field("count");
        ctx.out.text(&request.u32(0).to_string());
        return IoctlStatus::MoreAtExit;
    }
    if !ctx.syserror() {
        if let Some(buf) = ctx.umove(addr, 4) {
            ctx.out.value_changed();
            ctx.out.text(&StructView::new(&buf).u32(0).to_string());
        }
    }
    ctx.out.struct_end();
    IoctlStatus::Done
}

fn print_stream_type(ctx: &mut Ctx, addr: u64) -> IoctlStatus {
    ctx.out.next();
    if let Some(buf) = ctx.umove_or_printaddr(addr, 4) {
        ctx.out.array_begin();
        ctx.out.next();
        print_buf_type(ctx, StructView::new(&buf).u32(0) as u64);
        ctx.out.array_end();
    }
    IoctlStatus::Done
}

fn print_control(ctx: &mut Ctx, addr: u64, get: bool) -> IoctlStatus {
    if ctx.exiting() {
        if !ctx.syserror() {
            if let Some(buf) = ctx.umove(addr, V4L2_CONTROL_SIZE) {
                ctx.out.field("value");
                ctx.out.text(&StructView::new(&buf).s32(4).to_string());
            }
        }
        ctx.out.struct_end();
        return IoctlStatus::Done;
    }
    ctx.out.next();
    let Some(buf) = ctx.umove_or_printaddr(addr, V4L2_CONTROL_SIZE) else {
        return IoctlStatus::Done;
    };
    let control = StructView::new(&buf);
    ctx.out.struct_begin();
    ctx.out.field("id");
    print_xval(ctx, &V4L2_CONTROL_IDS, control.u32(0) as u64, "V4L2_CID_???");
    if get {
        return IoctlStatus::MoreAtExit;
    }
    ctx.out.field("value");
    ctx.out.text(&control.s32(4).to_string());
    ctx.out.struct_end();
    IoctlStatus::Done
}

pub fn v4l2_ioctl(ctx: &mut Ctx, code: u32, arg: u64) -> IoctlStatus {
    let addr = ctx.personality().narrow_word(arg);
    let wide = ctx.personality().word_size() == 8;
    let (g_fmt, s_fmt, try_fmt) = if wide {
        (VIDIOC_G_FMT, VIDIOC_S_FMT, VIDIOC_TRY_FMT)
    } else {
        (VIDIOC_G_FMT_32, VIDIOC_S_FMT_32, VIDIOC_TRY_FMT_32)
    };
    match code {
        VIDIOC_QUERYCAP => print_querycap(ctx, addr),
        VIDIOC_ENUM_FMT => print_enum_fmt(ctx, addr),
        code if code == g_fmt => print_format(ctx, addr, true),
        code if code == s_fmt || code == try_fmt => print_format(ctx, addr, false),
        VIDIOC_REQBUFS => print_reqbufs(ctx, addr),
        VIDIOC_STREAMON | VIDIOC_STREAMOFF => print_stream_type(ctx, addr),
        VIDIOC_G_CTRL => print_control(ctx, addr, true),
        VIDIOC_S_CTRL => print_control(ctx, addr, false),
        VIDIOC_G_INPUT => {
            if ctx.entering() {
                return IoctlStatus::MoreAtExit;
            }
            ctx.out.next();
            if ctx.syserror() {
                print_addr(ctx, addr);
            } else {
                print_int_ptr(ctx, addr);
            }
            IoctlStatus::Done
        }
        VIDIOC_S_INPUT => {
            ctx.out.next();
            print_int_ptr(ctx, addr);
            IoctlStatus::Done
        }
        _ => IoctlStatus::NotHandled,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::Config,
        decode::{render_call, Env},
        decorator::NoDecoration,
        peeker_poker::MemoryImage,
        personality::Personality,
        traced_call::TracedCall,
    };

    const ARG: u64 = 0x3000_0000;

    fn render(mem: &MemoryImage, personality: Personality, code: u32, rval: u64) -> String {
        let cfg = Config::default();
        let env = Env {
            mem,
            deco: &NoDecoration,
            cfg: &cfg,
        };
        // ioctl: 16 on x86_64, 54 on i386
        let scno = match personality {
            Personality::Compat32 => 54,
            _ => 16,
        };
        let mut call = TracedCall::new(1, scno, personality, [3, code as u64, ARG, 0, 0, 0]);
        render_call(&mut call, &env, rval)
    }

    fn pix_format(offset: usize) -> Vec<u8> {
        let mut format = vec![0u8; offset + V4L2_PIX_FORMAT_SIZE];
        let words: [u32; 7] = [640, 480, u32::from_le_bytes(*b"YUYV"), 1, 1280, 614_400, 8];
        format[0..4].copy_from_slice(&1u32.to_ne_bytes());
        for (index, word) in words.iter().enumerate() {
            let at = offset + 4 * index;
            format[at..at + 4].copy_from_slice(&word.to_ne_bytes());
        }
        format
    }

    #[test]
    fn fourcc() {
        let yuyv = u32::from_le_bytes(*b"YUYV");
        assert_eq!(format_fourcc(yuyv, XlatStyle::Abbrev), "v4l2_fourcc('Y', 'U', 'Y', 'V')");
        assert_eq!(format_fourcc(yuyv, XlatStyle::Raw), "0x56595559");
        assert_eq!(
            format_fourcc(u32::from_le_bytes([b'\'', 0x01, b'\\', b'A']), XlatStyle::Abbrev),
            "v4l2_fourcc('\\'', '\\x01', '\\\\', 'A')"
        );
        assert_eq!(format_kernel_version(0x050f00), "KERNEL_VERSION(5, 15, 0)");
    }

    const PIX: &str = "{width=640, height=480, pixelformat=v4l2_fourcc('Y', 'U', 'Y', 'V'), \
                       field=V4L2_FIELD_NONE, bytesperline=1280, sizeimage=614400, \
                       colorspace=V4L2_COLORSPACE_SRGB}";

    #[test]
    fn format_union_moves_with_the_personality() {
        let native = MemoryImage::new().with(ARG, pix_format(8));
        assert_eq!(
            render(&native, Personality::Native, VIDIOC_G_FMT, 0),
            format!("ioctl(3, VIDIOC_G_FMT, {{type=V4L2_BUF_TYPE_VIDEO_CAPTURE, fmt.pix={PIX}}}) = 0")
        );
        let compat = MemoryImage::new().with(ARG, pix_format(4));
        assert_eq!(
            render(&compat, Personality::Compat32, VIDIOC_G_FMT_32, 0),
            format!("ioctl(3, VIDIOC_G_FMT, {{type=V4L2_BUF_TYPE_VIDEO_CAPTURE, fmt.pix={PIX}}}) = 0")
        );
    }

    #[test]
    fn set_format_shows_the_adjusted_one() {
        let mem = MemoryImage::new().with(ARG, pix_format(8));
        assert_eq!(
            render(&mem, Personality::Native, VIDIOC_S_FMT, 0),
            format!("ioctl(3, VIDIOC_S_FMT, {{type=V4L2_BUF_TYPE_VIDEO_CAPTURE, fmt.pix={PIX} => {PIX}}}) = 0")
        );
        assert_eq!(
            render(&mem, Personality::Native, VIDIOC_S_FMT, (-16i64) as u64),
            format!(
                "ioctl(3, VIDIOC_S_FMT, {{type=V4L2_BUF_TYPE_VIDEO_CAPTURE, fmt.pix={PIX}}}) \
                 = -1 EBUSY (Device or resource busy)"
            )
        );
    }

    #[test]
    fn capabilities() {
        let mut caps = vec![0u8; V4L2_CAPABILITY_SIZE];
        caps[0..8].copy_from_slice(b"uvcvideo");
        caps[16..20].copy_from_slice(b"cam0");
        caps[80..84].copy_from_slice(&0x050f00u32.to_ne_bytes());
        caps[84..88].copy_from_slice(&0x8400_0001u32.to_ne_bytes());
        caps[88..92].copy_from_slice(&0x0400_0001u32.to_ne_bytes());
        let mem = MemoryImage::new().with(ARG, caps);
        assert_eq!(
            render(&mem, Personality::Native, VIDIOC_QUERYCAP, 0),
            "ioctl(3, VIDIOC_QUERYCAP, {driver=\"uvcvideo\", card=\"cam0\", bus_info=\"\", \
             version=KERNEL_VERSION(5, 15, 0), \
             capabilities=V4L2_CAP_VIDEO_CAPTURE|V4L2_CAP_STREAMING|V4L2_CAP_DEVICE_CAPS, \
             device_caps=V4L2_CAP_VIDEO_CAPTURE|V4L2_CAP_STREAMING}) = 0"
        );
    }

    #[test]
    fn request_buffers_count_changes() {
        let mut request = Vec::new();
        for word in [2u32, 1, 1, 0, 0] {
            request.extend_from_slice(&word.to_ne_bytes());
        }
        let mem = MemoryImage::new().with(ARG, request);
        assert_eq!(
            render(&mem, Personality::Native, VIDIOC_REQBUFS, 0),
            "ioctl(3, VIDIOC_REQBUFS, {type=V4L2_BUF_TYPE_VIDEO_CAPTURE, memory=V4L2_MEMORY_MMAP, \
             count=2 => 2}) = 0"
        );
    }

    #[test]
    fn controls_and_streams() {
        let mut control = Vec::new();
        control.extend_from_slice(&0x0098_0900u32.to_ne_bytes());
        control.extend_from_slice(&(-5i32).to_ne_bytes());
        let mem = MemoryImage::new().with(ARG, control);
        assert_eq!(
            render(&mem, Personality::Native, VIDIOC_G_CTRL, 0),
            "ioctl(3, VIDIOC_G_CTRL, {id=V4L2_CID_BRIGHTNESS, value=-5}) = 0"
        );
        let stream = MemoryImage::new().with(ARG, 1u32.to_ne_bytes());
        assert_eq!(
            render(&stream, Personality::Native, VIDIOC_STREAMON, 0),
            "ioctl(3, VIDIOC_STREAMON, [V4L2_BUF_TYPE_VIDEO_CAPTURE]) = 0"
        );
    }
}
