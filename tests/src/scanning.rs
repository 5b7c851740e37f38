mod host;
mod network;
mod support;
