use qpxap_frame::{FRAME_SIZE, MAX_PAYLOAD, TOKEN};
use qpxap_transport::{XAP_USAGE, XAP_USAGE_PAGE};

use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("qpxap {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: qpxap");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!("target: {}", target_triple());
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!("git_hash: {}", option_env!("GIT_HASH").unwrap_or("unknown"));
    println!(
        "protocol: token={:02x}{:02x} frame={} max_payload={}",
        TOKEN[0], TOKEN[1], FRAME_SIZE, MAX_PAYLOAD
    );
    println!("xap_interface: usage_page={XAP_USAGE_PAGE:#06x} usage={XAP_USAGE:#06x}");
    println!(
        "report_id_prefix: {}",
        qpxap_frame::FrameConfig::default().report_id_prefix
    );
    println!("features: hid={}, cli=true", cfg!(feature = "hid"));

    Ok(SUCCESS)
}

fn target_triple() -> String {
    if let Some(target) = option_env!("QPXAP_BUILD_TARGET") {
        return target.to_string();
    }
    format!("{}-unknown-{}", std::env::consts::ARCH, std::env::consts::OS)
}
