mod async_task;
mod cancel_context;
mod condition;
mod fan_in;
mod fan_out;
mod fault;
mod rate_gate;
mod ring_buffer;
mod synchronize;

pub use self::{
  async_task::*, cancel_context::*, condition::*, fan_in::*, fan_out::*, fault::*, rate_gate::*, ring_buffer::*,
  synchronize::*,
};
