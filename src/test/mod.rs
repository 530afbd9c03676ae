mod clock;
mod forwarding;
mod queues;
mod wire;
