mod read_op;
mod resizable;
mod resize_op;
mod write_op;

pub use resizable::ResizableRecord;
