//! Built-in command templates and flags.
//!
//! These entries are the compatibility surface for existing port projects:
//! the template names, flag spellings and platform patterns must stay exactly
//! as they are. Platform-specific entries come after the generic ones and win
//! over them once filtered.

use crate::platform::arch;
use crate::platform::runtime::RuntimeDirs;
use crate::platform::PlatformId;
use crate::vars::VarEntry;

/// Template used to compile C sources for a shared driver.
pub const DRV_CC_TEMPLATE: &str = "DRV_CC_TEMPLATE";
/// Template used to compile C++ sources for a shared driver.
pub const DRV_CXX_TEMPLATE: &str = "DRV_CXX_TEMPLATE";
/// Template used to link a shared driver.
pub const DRV_LINK_TEMPLATE: &str = "DRV_LINK_TEMPLATE";
/// Template used to compile C sources for an executable.
pub const EXE_CC_TEMPLATE: &str = "EXE_CC_TEMPLATE";
/// Template used to compile C++ sources for an executable.
pub const EXE_CXX_TEMPLATE: &str = "EXE_CXX_TEMPLATE";
/// Template used to link an executable.
pub const EXE_LINK_TEMPLATE: &str = "EXE_LINK_TEMPLATE";

/// Placeholder replaced by the input file(s) of a command.
pub const PORT_IN_FILES: &str = "PORT_IN_FILES";
/// Placeholder replaced by the output file of a command.
pub const PORT_OUT_FILE: &str = "PORT_OUT_FILE";

/// The default environment, before platform filtering.
pub fn default_env(runtime: &RuntimeDirs, platform: &PlatformId) -> Vec<VarEntry> {
  let erl_cflags = format!(
    " -I\"{}\" -I\"{}\" ",
    runtime.ei_include.display(),
    runtime.erts_include.display()
  );
  let ei_libdir = format!("\"{}\"", runtime.ei_lib.display());

  vec![
    VarEntry::new("CC", "cc"),
    VarEntry::new("CXX", "c++"),
    VarEntry::new(
      DRV_CXX_TEMPLATE,
      "$CXX -c $CXXFLAGS $DRV_CFLAGS $PORT_IN_FILES -o $PORT_OUT_FILE",
    ),
    VarEntry::new(
      DRV_CC_TEMPLATE,
      "$CC -c $CFLAGS $DRV_CFLAGS $PORT_IN_FILES -o $PORT_OUT_FILE",
    ),
    VarEntry::new(
      DRV_LINK_TEMPLATE,
      "$CC $PORT_IN_FILES $LDFLAGS $DRV_LDFLAGS -o $PORT_OUT_FILE",
    ),
    VarEntry::new(
      EXE_CXX_TEMPLATE,
      "$CXX -c $CXXFLAGS $EXE_CFLAGS $PORT_IN_FILES -o $PORT_OUT_FILE",
    ),
    VarEntry::new(
      EXE_CC_TEMPLATE,
      "$CC -c $CFLAGS $EXE_CFLAGS $PORT_IN_FILES -o $PORT_OUT_FILE",
    ),
    VarEntry::new(
      EXE_LINK_TEMPLATE,
      "$CC $PORT_IN_FILES $LDFLAGS $EXE_LDFLAGS -o $PORT_OUT_FILE",
    ),
    VarEntry::new("DRV_CFLAGS", "-g -Wall -fPIC -MMD $ERL_CFLAGS"),
    VarEntry::new("DRV_LDFLAGS", "-shared $ERL_LDFLAGS"),
    VarEntry::new("EXE_CFLAGS", "-g -Wall -fPIC -MMD $ERL_CFLAGS"),
    VarEntry::new("EXE_LDFLAGS", "$ERL_LDFLAGS"),
    VarEntry::new("ERL_CFLAGS", erl_cflags),
    VarEntry::new("ERL_EI_LIBDIR", ei_libdir),
    VarEntry::new("ERL_LDFLAGS", " -L$ERL_EI_LIBDIR -lerl_interface -lei"),
    VarEntry::new("ERLANG_ARCH", arch::wordsize()),
    VarEntry::new("ERLANG_TARGET", platform.as_str()),
    VarEntry::on(
      "darwin",
      "DRV_LDFLAGS",
      "-bundle -flat_namespace -undefined suppress $ERL_LDFLAGS",
    ),
    // Solaris 64-bit
    VarEntry::on("solaris.*-64$", "CFLAGS", "-D_REENTRANT -m64 $CFLAGS"),
    VarEntry::on("solaris.*-64$", "CXXFLAGS", "-D_REENTRANT -m64 $CXXFLAGS"),
    VarEntry::on("solaris.*-64$", "LDFLAGS", "-m64 $LDFLAGS"),
    // OS X Leopard 64-bit
    VarEntry::on("darwin9.*-64$", "CFLAGS", "-m64 $CFLAGS"),
    VarEntry::on("darwin9.*-64$", "CXXFLAGS", "-m64 $CXXFLAGS"),
    VarEntry::on("darwin9.*-64$", "LDFLAGS", "-arch x86_64 $LDFLAGS"),
    // OS X Snow Leopard 32-bit
    VarEntry::on("darwin10.*-32", "CFLAGS", "-m32 $CFLAGS"),
    VarEntry::on("darwin10.*-32", "CXXFLAGS", "-m32 $CXXFLAGS"),
    VarEntry::on("darwin10.*-32", "LDFLAGS", "-arch i386 $LDFLAGS"),
    // OS X Lion 32-bit
    VarEntry::on("darwin11.*-32", "CFLAGS", "-m32 $CFLAGS"),
    VarEntry::on("darwin11.*-32", "CXXFLAGS", "-m32 $CXXFLAGS"),
    VarEntry::on("darwin11.*-32", "LDFLAGS", "-arch i386 $LDFLAGS"),
    // MSVC; the DRV_* and EXE_* templates are identical
    VarEntry::on("win32", "CC", "cl.exe"),
    VarEntry::on("win32", "CXX", "cl.exe"),
    VarEntry::on("win32", "LINKER", "link.exe"),
    VarEntry::on(
      "win32",
      DRV_CXX_TEMPLATE,
      "$CXX /c $CXXFLAGS $DRV_CFLAGS $PORT_IN_FILES /Fo$PORT_OUT_FILE",
    ),
    VarEntry::on(
      "win32",
      DRV_CC_TEMPLATE,
      "$CC /c $CFLAGS $DRV_CFLAGS $PORT_IN_FILES /Fo$PORT_OUT_FILE",
    ),
    VarEntry::on(
      "win32",
      DRV_LINK_TEMPLATE,
      "$LINKER $PORT_IN_FILES $LDFLAGS $DRV_LDFLAGS /OUT:$PORT_OUT_FILE",
    ),
    VarEntry::on(
      "win32",
      EXE_CXX_TEMPLATE,
      "$CXX /c $CXXFLAGS $EXE_CFLAGS $PORT_IN_FILES /Fo$PORT_OUT_FILE",
    ),
    VarEntry::on(
      "win32",
      EXE_CC_TEMPLATE,
      "$CC /c $CFLAGS $EXE_CFLAGS $PORT_IN_FILES /Fo$PORT_OUT_FILE",
    ),
    VarEntry::on(
      "win32",
      EXE_LINK_TEMPLATE,
      "$LINKER $PORT_IN_FILES $LDFLAGS $EXE_LDFLAGS /OUT:$PORT_OUT_FILE",
    ),
    // ERL_CFLAGS keeps -I; cl.exe accepts it alongside /I
    VarEntry::on("win32", "ERL_LDFLAGS", " /LIBPATH:$ERL_EI_LIBDIR erl_interface.lib ei.lib"),
    VarEntry::on("win32", "DRV_CFLAGS", "/Zi /Wall $ERL_CFLAGS"),
    VarEntry::on("win32", "DRV_LDFLAGS", "/DLL $ERL_LDFLAGS"),
  ]
}
