use anyhow::Result;

use portc_lib::platform::arch;
use portc_lib::platform::runtime::RuntimeDirs;

use super::ProjectArgs;
use crate::output::{print_info, print_stat};

pub fn cmd_info(args: &ProjectArgs) -> Result<()> {
  let config = args.load_config()?;

  println!("System:");
  print_stat("Platform", config.platform_id().as_str());
  print_stat("Word size", arch::wordsize());

  println!("Runtime:");
  match RuntimeDirs::discover(config.runtime_root.as_deref()) {
    Ok(dirs) => {
      print_stat("erl_interface include", &dirs.ei_include.display().to_string());
      print_stat("erl_interface lib", &dirs.ei_lib.display().to_string());
      print_stat("erts include", &dirs.erts_include.display().to_string());
    }
    Err(e) => print_info(&format!("Not found: {e}")),
  }

  println!("Project:");
  print_stat("Config", &args.config.display().to_string());
  print_stat("Specs", &config.port_specs.len().to_string());
  Ok(())
}
