pub mod codec;
pub mod message;
pub mod opcode;

pub use codec::LinkCodec;
pub use message::Message;
pub use opcode::{Opcode, OpcodeClass};
