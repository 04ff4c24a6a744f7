// Device-specific command strings on top of the SCPI engine.  Only Red Pitaya boards (running
// their SCPI server on port 5000) are supported so far.

pub mod red_pitaya;
