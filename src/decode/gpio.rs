// GPIO character device ioctls, v1 and v2 uAPI
//
// requests that hand out a line fd print the request at entry and the fd
// as `=> {fd=N}` at exit. every count taken from the tracee is clamped to
// the size of the fixed array it indexes before anything is rendered.

use crate::{
    decode::{ioctl::IoctlStatus, Ctx},
    render::{
        array::print_local_array,
        flags::{print_flags, print_xval},
        primitives::{print_addr, print_fd, print_uint_ptr},
        strings::format_local_cstring,
        structure::{print_fields, print_struct, Field, FieldKind},
        StructView,
    },
    xlat::{format_hex, gpio::*},
};

const GPIOCHIP_INFO_SIZE: usize = 68;
const GPIOLINE_INFO_SIZE: usize = 72;
const GPIOHANDLE_REQUEST_SIZE: usize = 364;
const GPIOHANDLE_CONFIG_SIZE: usize = 84;
const GPIOHANDLE_DATA_SIZE: usize = 64;
const GPIOEVENT_REQUEST_SIZE: usize = 48;
const GPIO_V2_LINE_INFO_SIZE: usize = 256;
const GPIO_V2_LINE_CONFIG_SIZE: usize = 272;
const GPIO_V2_LINE_REQUEST_SIZE: usize = 592;
const GPIO_V2_LINE_VALUES_SIZE: usize = 16;

const GPIO_V2_LINE_ATTRIBUTE_SIZE: usize = 16;
const GPIO_V2_LINE_CONFIG_ATTRIBUTE_SIZE: usize = 24;

static CHIPINFO_FIELDS: [Field; 3] = [
    Field::new("name", 0, 32, FieldKind::CString),
    Field::new("label", 32, 32, FieldKind::CString),
    Field::new("lines", 64, 4, FieldKind::Uint),
];

static LINEINFO_OUT_FIELDS: [Field; 3] = [
    Field::new("flags", 4, 4, FieldKind::Flags(&GPIO_LINE_FLAGS, "GPIOLINE_FLAG_???")),
    Field::new("name", 8, 32, FieldKind::CString),
    Field::new("consumer", 40, 32, FieldKind::CString),
];

static EVENT_REQUEST_FIELDS: [Field; 4] = [
    Field::new("lineoffset", 0, 4, FieldKind::Uint),
    Field::new("handleflags", 4, 4, FieldKind::Flags(&GPIO_HANDLE_FLAGS, "GPIOHANDLE_REQUEST_???")),
    Field::new("eventflags", 8, 4, FieldKind::Flags(&GPIO_EVENT_FLAGS, "GPIOEVENT_REQUEST_???")),
    Field::new("consumer_label", 12, 32, FieldKind::CString),
];

fn print_u8(ctx: &mut Ctx, element: &[u8]) {
    ctx.out.text(&StructView::new(element).u8(0).to_string());
}

fn print_u32(ctx: &mut Ctx, element: &[u8]) {
    ctx.out.text(&StructView::new(element).u32(0).to_string());
}

/// Closes the structure opened at entry and appends what the kernel wrote.
fn print_exit_update<F>(ctx: &mut Ctx, addr: u64, size: usize, render: F) -> IoctlStatus
where
    F: FnOnce(&mut Ctx, StructView),
{
    ctx.out.struct_end();
    if ctx.syserror() {
        return IoctlStatus::Done;
    }
    if let Some(buf) = ctx.umove(addr, size) {
        ctx.out.value_changed();
        ctx.out.struct_begin();
        render(ctx, StructView::new(&buf));
        ctx.out.struct_end();
    }
    IoctlStatus::Done
}

fn print_returned_fd(offset: usize) -> impl FnOnce(&mut Ctx, StructView) {
    move |ctx, view| {
        ctx.out.field("fd");
        print_fd(ctx, view.s32(offset));
    }
}

/// A structure only the kernel fills in.
fn print_at_exit(ctx: &mut Ctx, addr: u64, size: usize, render: fn(&mut Ctx, StructView)) -> IoctlStatus {
    if ctx.entering() {
        return IoctlStatus::MoreAtExit;
    }
    ctx.out.next();
    if ctx.syserror() {
        print_addr(ctx, addr);
    } else if let Some(buf) = ctx.umove_or_printaddr(addr, size) {
        render(ctx, StructView::new(&buf));
    }
    IoctlStatus::Done
}

/// A structure only the kernel reads.
fn print_at_entry(ctx: &mut Ctx, addr: u64, size: usize, render: fn(&mut Ctx, StructView)) -> IoctlStatus {
    ctx.out.next();
    if let Some(buf) = ctx.umove_or_printaddr(addr, size) {
        render(ctx, StructView::new(&buf));
    }
    IoctlStatus::Done
}

fn print_chipinfo(ctx: &mut Ctx, view: StructView) {
    print_struct(ctx, view, &CHIPINFO_FIELDS);
}

fn print_lineinfo(ctx: &mut Ctx, addr: u64) -> IoctlStatus {
    if ctx.exiting() {
        return print_exit_update(ctx, addr, GPIOLINE_INFO_SIZE, |ctx, view| {
            print_fields(ctx, view, &LINEINFO_OUT_FIELDS)
        });
    }
    ctx.out.next();
    let Some(buf) = ctx.umove_or_printaddr(addr, GPIOLINE_INFO_SIZE) else {
        return IoctlStatus::Done;
    };
    ctx.out.struct_begin();
    ctx.out.field("line_offset");
    print_u32(ctx, &buf);
    IoctlStatus::MoreAtExit
}

fn print_handle_request(ctx: &mut Ctx, addr: u64) -> IoctlStatus {
    if ctx.exiting() {
        return print_exit_update(ctx, addr, GPIOHANDLE_REQUEST_SIZE, print_returned_fd(360));
    }
    ctx.out.next();
    let Some(buf) = ctx.umove_or_printaddr(addr, GPIOHANDLE_REQUEST_SIZE) else {
        return IoctlStatus::Done;
    };
    let view = StructView::new(&buf);
    let lines = view.u32(356);
    let flags = view.u32(256) as u64;
    let shown = (lines as usize).min(GPIOHANDLES_MAX);
    ctx.out.struct_begin();
    ctx.out.field("lines");
    ctx.out.text(&lines.to_string());
    ctx.out.field("lineoffsets");
    print_local_array(ctx, view.bytes(0, 4 * GPIOHANDLES_MAX), shown, 4, print_u32);
    ctx.out.field("flags");
    print_flags(ctx, &GPIO_HANDLE_FLAGS, flags, "GPIOHANDLE_REQUEST_???");
    if flags & GPIOHANDLE_REQUEST_OUTPUT != 0 {
        ctx.out.field("default_values");
        print_local_array(ctx, view.bytes(260, GPIOHANDLES_MAX), shown, 1, print_u8);
    }
    ctx.out.field("consumer_label");
    ctx.out.text(&format_local_cstring(view.bytes(324, 32)));
    IoctlStatus::MoreAtExit
}

fn print_event_request(ctx: &mut Ctx, addr: u64) -> IoctlStatus {
    if ctx.exiting() {
        return print_exit_update(ctx, addr, GPIOEVENT_REQUEST_SIZE, print_returned_fd(44));
    }
    ctx.out.next();
    let Some(buf) = ctx.umove_or_printaddr(addr, GPIOEVENT_REQUEST_SIZE) else {
        return IoctlStatus::Done;
    };
    ctx.out.struct_begin();
    print_fields(ctx, StructView::new(&buf), &EVENT_REQUEST_FIELDS);
    IoctlStatus::MoreAtExit
}

fn print_handle_data(ctx: &mut Ctx, view: StructView) {
    ctx.out.struct_begin();
    ctx.out.field("values");
    print_local_array(ctx, view.bytes(0, GPIOHANDLES_MAX), GPIOHANDLES_MAX, 1, print_u8);
    ctx.out.struct_end();
}

fn print_handle_config(ctx: &mut Ctx, view: StructView) {
    ctx.out.struct_begin();
    ctx.out.field("flags");
    print_flags(ctx, &GPIO_HANDLE_FLAGS, view.u32(0) as u64, "GPIOHANDLE_REQUEST_???");
    ctx.out.field("default_values");
    print_local_array(ctx, view.bytes(4, GPIOHANDLES_MAX), GPIOHANDLES_MAX, 1, print_u8);
    ctx.out.struct_end();
}

/// `struct gpio_v2_line_attribute`: the union member follows `id`
fn print_line_attribute(ctx: &mut Ctx, attr: StructView) {
    let id = attr.u32(0) as u64;
    ctx.out.struct_begin();
    ctx.out.field("id");
    print_xval(ctx, &GPIO_V2_LINE_ATTR_IDS, id, "GPIO_V2_LINE_ATTR_ID_???");
    match id {
        GPIO_V2_LINE_ATTR_ID_FLAGS => {
            ctx.out.field("flags");
            print_flags(ctx, &GPIO_V2_LINE_FLAGS, attr.u64(8), "GPIO_V2_LINE_FLAG_???");
        }
        GPIO_V2_LINE_ATTR_ID_OUTPUT_VALUES => {
            ctx.out.field("values");
            ctx.out.text(&format_hex(attr.u64(8)));
        }
        GPIO_V2_LINE_ATTR_ID_DEBOUNCE => {
            ctx.out.field("debounce_period_us");
            ctx.out.text(&attr.u32(8).to_string());
        }
        _ => {
            ctx.out.field("data");
            ctx.out.text(&format_hex(attr.u64(8)));
        }
    }
    ctx.out.struct_end();
}

fn print_line_config(ctx: &mut Ctx, view: StructView) {
    let num_attrs = view.u32(8);
    ctx.out.struct_begin();
    ctx.out.field("flags");
    print_flags(ctx, &GPIO_V2_LINE_FLAGS, view.u64(0), "GPIO_V2_LINE_FLAG_???");
    ctx.out.field("num_attrs");
    ctx.out.text(&num_attrs.to_string());
    if num_attrs != 0 {
        let shown = (num_attrs as usize).min(GPIO_V2_LINE_NUM_ATTRS_MAX);
        ctx.out.field("attrs");
        let attrs = view.bytes(32, GPIO_V2_LINE_NUM_ATTRS_MAX * GPIO_V2_LINE_CONFIG_ATTRIBUTE_SIZE);
        print_local_array(ctx, attrs, shown, GPIO_V2_LINE_CONFIG_ATTRIBUTE_SIZE, |ctx, element| {
            let element = StructView::new(element);
            ctx.out.struct_begin();
            ctx.out.field("attr");
            print_line_attribute(ctx, element);
            ctx.out.field("mask");
            ctx.out.text(&format_hex(element.u64(16)));
            ctx.out.struct_end();
        });
    }
    ctx.out.struct_end();
}

fn print_v2_lineinfo_update(ctx: &mut Ctx, view: StructView) {
    let num_attrs = view.u32(68);
    ctx.out.field("name");
    ctx.out.text(&format_local_cstring(view.bytes(0, 32)));
    ctx.out.field("consumer");
    ctx.out.text(&format_local_cstring(view.bytes(32, 32)));
    ctx.out.field("flags");
    print_flags(ctx, &GPIO_V2_LINE_FLAGS, view.u64(72), "GPIO_V2_LINE_FLAG_???");
    ctx.out.field("num_attrs");
    ctx.out.text(&num_attrs.to_string());
    if num_attrs != 0 {
        let shown = (num_attrs as usize).min(GPIO_V2_LINE_NUM_ATTRS_MAX);
        ctx.out.field("attrs");
        let attrs = view.bytes(80, GPIO_V2_LINE_NUM_ATTRS_MAX * GPIO_V2_LINE_ATTRIBUTE_SIZE);
        print_local_array(ctx, attrs, shown, GPIO_V2_LINE_ATTRIBUTE_SIZE, |ctx, element| {
            print_line_attribute(ctx, StructView::new(element))
        });
    }
}

fn print_v2_lineinfo(ctx: &mut Ctx, addr: u64) -> IoctlStatus {
    if ctx.exiting() {
        return print_exit_update(ctx, addr, GPIO_V2_LINE_INFO_SIZE, print_v2_lineinfo_update);
    }
    ctx.out.next();
    let Some(buf) = ctx.umove_or_printaddr(addr, GPIO_V2_LINE_INFO_SIZE) else {
        return IoctlStatus::Done;
    };
    ctx.out.struct_begin();
    ctx.out.field("offset");
    print_u32(ctx, StructView::new(&buf).bytes(64, 4));
    IoctlStatus::MoreAtExit
}

fn print_line_request(ctx: &mut Ctx, addr: u64) -> IoctlStatus {
    if ctx.exiting() {
        return print_exit_update(ctx, addr, GPIO_V2_LINE_REQUEST_SIZE, print_returned_fd(588));
    }
    ctx.out.next();
    let Some(buf) = ctx.umove_or_printaddr(addr, GPIO_V2_LINE_REQUEST_SIZE) else {
        return IoctlStatus::Done;
    };
    let view = StructView::new(&buf);
    let num_lines = view.u32(560);
    ctx.out.struct_begin();
    ctx.out.field("num_lines");
    ctx.out.text(&num_lines.to_string());
    ctx.out.field("offsets");
    let shown = (num_lines as usize).min(GPIO_V2_LINES_MAX);
    print_local_array(ctx, view.bytes(0, 4 * GPIO_V2_LINES_MAX), shown, 4, print_u32);
    ctx.out.field("consumer");
    ctx.out.text(&format_local_cstring(view.bytes(256, 32)));
    ctx.out.field("config");
    print_line_config(ctx, view.sub(288));
    ctx.out.field("event_buffer_size");
    ctx.out.text(&view.u32(564).to_string());
    IoctlStatus::MoreAtExit
}

fn print_get_values(ctx: &mut Ctx, addr: u64) -> IoctlStatus {
    if ctx.exiting() {
        return print_exit_update(ctx, addr, GPIO_V2_LINE_VALUES_SIZE, |ctx, view| {
            ctx.out.field("bits");
            ctx.out.text(&format_hex(view.u64(0)));
        });
    }
    ctx.out.next();
    let Some(buf) = ctx.umove_or_printaddr(addr, GPIO_V2_LINE_VALUES_SIZE) else {
        return IoctlStatus::Done;
    };
    ctx.out.struct_begin();
    ctx.out.field("mask");
    ctx.out.text(&format_hex(StructView::new(&buf).u64(8)));
    IoctlStatus::MoreAtExit
}

fn print_set_values(ctx: &mut Ctx, view: StructView) {
    ctx.out.struct_begin();
    ctx.out.field("bits");
    ctx.out.text(&format_hex(view.u64(0)));
    ctx.out.field("mask");
    ctx.out.text(&format_hex(view.u64(8)));
    ctx.out.struct_end();
}

pub fn gpio_ioctl(ctx: &mut Ctx, code: u32, arg: u64) -> IoctlStatus {
    let addr = ctx.personality().narrow_word(arg);
    match code {
        GPIO_GET_CHIPINFO_IOCTL => print_at_exit(ctx, addr, GPIOCHIP_INFO_SIZE, print_chipinfo),
        GPIO_GET_LINEINFO_UNWATCH_IOCTL => {
            ctx.out.next();
            print_uint_ptr(ctx, addr);
            IoctlStatus::Done
        }
        GPIO_GET_LINEINFO_IOCTL | GPIO_GET_LINEINFO_WATCH_IOCTL => print_lineinfo(ctx, addr),
        GPIO_GET_LINEHANDLE_IOCTL => print_handle_request(ctx, addr),
        GPIO_GET_LINEEVENT_IOCTL => print_event_request(ctx, addr),
        GPIOHANDLE_GET_LINE_VALUES_IOCTL => {
            print_at_exit(ctx, addr, GPIOHANDLE_DATA_SIZE, print_handle_data)
        }
        GPIOHANDLE_SET_LINE_VALUES_IOCTL => {
            print_at_entry(ctx, addr, GPIOHANDLE_DATA_SIZE, print_handle_data)
        }
        GPIOHANDLE_SET_CONFIG_IOCTL => {
            print_at_entry(ctx, addr, GPIOHANDLE_CONFIG_SIZE, print_handle_config)
        }
        GPIO_V2_GET_LINEINFO_IOCTL | GPIO_V2_GET_LINEINFO_WATCH_IOCTL => print_v2_lineinfo(ctx, addr),
        GPIO_V2_GET_LINE_IOCTL => print_line_request(ctx, addr),
        GPIO_V2_LINE_SET_CONFIG_IOCTL => {
            print_at_entry(ctx, addr, GPIO_V2_LINE_CONFIG_SIZE, print_line_config)
        }
        GPIO_V2_LINE_GET_VALUES_IOCTL => print_get_values(ctx, addr),
        GPIO_V2_LINE_SET_VALUES_IOCTL => {
            print_at_entry(ctx, addr, GPIO_V2_LINE_VALUES_SIZE, print_set_values)
        }
        _ => IoctlStatus::NotHandled,
    }
}
