use portc_lib::build::{BuildOptions, clean, compile_and_link};
use portc_lib::config::PortConfig;
use portc_lib::env::TemplateResolver;
use portc_lib::error::PortError;
use portc_lib::shell::SystemShell;
use portc_lib::spec::{Spec, TargetType, build_specs};

use super::common::{FakeCompiler, TestProject};

fn project_config(project: &TestProject) -> PortConfig {
  let dir = project.temp.path().display();
  let content = format!(
    r#"
      app_name = "demo"
      platform = "x86_64-unknown-linux-gnu-64"
      runtime_root = '{root}'
      defines = ["NDEBUG"]
      port_env = [
        ["CFLAGS", "$CFLAGS -O2"],
        ["darwin", "CFLAGS", "$CFLAGS -DDARWIN"],
      ]

      [[port_specs]]
      target = '{dir}/priv/demo_drv.so'
      sources = ['{dir}/c_src/*.c', '{dir}/c_src/*.cpp']

      [[port_specs]]
      target = '{dir}/priv/demo_tool'
      sources = ['{dir}/tool/*.c']
      env = [["EXE_CFLAGS", "$EXE_CFLAGS -DTOOL"]]

      [[port_specs]]
      target = '{dir}/priv/win_only.dll'
      sources = ['{dir}/c_src/*.c']
      arch = "win32"
    "#,
    root = project.runtime_root().display(),
  );
  PortConfig::parse(&content).unwrap()
}

fn project_specs(project: &TestProject) -> Vec<Spec> {
  let config = project_config(project);
  let resolver = TemplateResolver::for_config(&config).unwrap();
  build_specs(&config, &resolver, &[]).unwrap()
}

fn setup_sources(project: &TestProject) {
  for (file, body) in [
    ("c_src/a.c", "int a(void) { return 1; }\n"),
    ("c_src/b.cpp", "int b() { return 2; }\n"),
    ("tool/main.c", "int main(void) { return 0; }\n"),
  ] {
    project.write_file(file, body);
    project.set_mtime(file, 1);
  }
}

#[test]
fn specs_follow_config() {
  let project = TestProject::new();
  setup_sources(&project);

  let specs = project_specs(&project);

  assert_eq!(specs.len(), 2, "win32-only spec is skipped");
  assert_eq!(specs[0].target_type, TargetType::Drv);
  assert_eq!(specs[0].sources, vec![project.path("c_src/a.c"), project.path("c_src/b.cpp")]);
  assert_eq!(specs[1].target_type, TargetType::Exe);
  assert!(specs[1].env["EXE_CFLAGS"].ends_with(" -DTOOL"));
  assert!(!specs[0].env["EXE_CFLAGS"].contains("-DTOOL"));
  assert!(!specs[0].env["CFLAGS"].contains("DARWIN"));
}

#[tokio::test]
async fn build_rebuild_and_incremental_change() {
  let project = TestProject::new();
  setup_sources(&project);
  let specs = project_specs(&project);
  let compiler = FakeCompiler::starting_at(10);
  let options = BuildOptions::new(project.temp.path());
  let p = |rel: &str| project.path(rel).display().to_string();

  let mut console = Vec::new();
  let report = compile_and_link(&specs, &compiler, &options, &mut console).await.unwrap();

  let commands = compiler.take_commands();
  assert_eq!(commands.len(), 5);
  assert!(commands[0].starts_with("cc -c "));
  assert!(commands[0].contains("-O2"));
  assert!(commands[0].contains("-fPIC -MMD"));
  assert!(commands[0].contains("-DNDEBUG"));
  assert!(commands[0].ends_with(&format!("{} -o {}", p("c_src/a.c"), p("c_src/a.o"))));
  assert!(commands[1].starts_with("c++ -c "));
  assert!(commands[1].ends_with(&format!("{} -o {}", p("c_src/b.cpp"), p("c_src/b.o"))));
  assert!(commands[2].contains("-DTOOL"));
  assert!(commands[3].starts_with(&format!("cc {} {} ", p("c_src/a.o"), p("c_src/b.o"))));
  assert!(commands[3].contains("-shared"));
  assert!(commands[3].ends_with(&format!("-o {}", p("priv/demo_drv.so"))));
  assert!(commands[4].ends_with(&format!("-o {}", p("priv/demo_tool"))));
  assert_eq!(report.linked, vec![project.path("priv/demo_drv.so"), project.path("priv/demo_tool")]);

  let console = String::from_utf8(console).unwrap();
  assert!(console.starts_with(&format!("Compiling {}\nok cc\n", p("c_src/a.c"))));

  let report = compile_and_link(&specs, &compiler, &options, &mut Vec::new()).await.unwrap();
  assert!(compiler.take_commands().is_empty());
  assert!(report.is_noop());

  project.set_mtime("c_src/b.cpp", 100);
  let report = compile_and_link(&specs, &compiler, &options, &mut Vec::new()).await.unwrap();
  let commands = compiler.take_commands();
  assert_eq!(commands.len(), 2);
  assert!(commands[0].starts_with("c++ -c "));
  assert!(commands[1].ends_with(&format!("-o {}", p("priv/demo_drv.so"))));
  assert_eq!(report.skipped_links, vec![project.path("priv/demo_tool")]);
}

#[tokio::test]
async fn clean_removes_build_products() {
  let project = TestProject::new();
  setup_sources(&project);
  let specs = project_specs(&project);
  let compiler = FakeCompiler::starting_at(10);
  compile_and_link(&specs, &compiler, &BuildOptions::new(project.temp.path()), &mut Vec::new())
    .await
    .unwrap();

  let removed = clean(&specs).unwrap();

  assert_eq!(removed.len(), 5);
  assert!(!project.path("priv/demo_drv.so").exists());
  assert!(!project.path("c_src/a.o").exists());
  assert!(project.path("c_src/a.c").exists());
  assert!(clean(&specs).unwrap().is_empty());
}

#[test]
fn spec_without_matching_sources_is_skipped() {
  let project = TestProject::new();
  let config = PortConfig::parse(&format!(
    r#"
      platform = "x86_64-unknown-linux-gnu-64"
      runtime_root = '{root}'

      [[port_specs]]
      target = "priv/empty.so"
      sources = ['{dir}/nothing/*.c']
    "#,
    root = project.runtime_root().display(),
    dir = project.temp.path().display(),
  ))
  .unwrap();
  let resolver = TemplateResolver::for_config(&config).unwrap();

  assert!(build_specs(&config, &resolver, &[]).unwrap().is_empty());
}

#[test]
fn unknown_target_extension_needs_declared_type() {
  let project = TestProject::new();
  project.write_file("c_src/a.c", "");
  let spec_toml = |type_line: &str| {
    format!(
      r#"
        platform = "x86_64-unknown-linux-gnu-64"
        runtime_root = '{root}'

        [[port_specs]]
        target = "priv/demo.bundle"
        sources = ['{dir}/c_src/*.c']
        {type_line}
      "#,
      root = project.runtime_root().display(),
      dir = project.temp.path().display(),
    )
  };

  let config = PortConfig::parse(&spec_toml("")).unwrap();
  let resolver = TemplateResolver::for_config(&config).unwrap();
  assert!(matches!(build_specs(&config, &resolver, &[]), Err(PortError::Config(_))));

  let config = PortConfig::parse(&spec_toml(r#"type = "drv""#)).unwrap();
  let specs = build_specs(&config, &resolver, &[]).unwrap();
  assert_eq!(specs[0].link_template(), "DRV_LINK_TEMPLATE");
}

#[test]
fn invalid_arch_pattern_is_fatal() {
  let project = TestProject::new();
  let config = PortConfig::parse(&format!(
    r#"
      platform = "x86_64-unknown-linux-gnu-64"
      runtime_root = '{root}'

      [[port_specs]]
      target = "priv/x.so"
      sources = ["c_src/*.c"]
      arch = "linux("
    "#,
    root = project.runtime_root().display(),
  ))
  .unwrap();
  let resolver = TemplateResolver::for_config(&config).unwrap();

  assert!(matches!(
    build_specs(&config, &resolver, &[]),
    Err(PortError::InvalidPattern { .. })
  ));
}

/// Stand-in compiler: takes the header `port.h` from whichever `-I` directory
/// holds it and fails on `-L` directories that do not exist.
#[cfg(unix)]
const HEADER_COMPILER: &str = r#"
compile=no
out=
hdr=
inputs=
while [ $# -gt 0 ]; do
  case "$1" in
    -c) compile=yes ;;
    -o) out="$2"; shift ;;
    -I*) if [ -f "${1#-I}/port.h" ]; then hdr="${1#-I}/port.h"; fi ;;
    -L*) if [ ! -d "${1#-L}" ]; then echo "no such directory: ${1#-L}" >&2; exit 1; fi ;;
    -*) ;;
    *) inputs="$inputs $1" ;;
  esac
  shift
done
if [ $compile = yes ]; then
  if [ -z "$hdr" ]; then echo "port.h: No such file or directory" >&2; exit 1; fi
  cat "$hdr" $inputs > "$out"
else
  cat $inputs > "$out"
fi
"#;

#[tokio::test]
#[cfg(unix)]
async fn runtime_path_with_spaces_reaches_the_compiler() {
  let project = TestProject::new();
  for dir in [
    "my otp/lib/erl_interface-5.5/include",
    "my otp/lib/erl_interface-5.5/lib",
    "my otp/erts-14.2/include",
  ] {
    std::fs::create_dir_all(project.path(dir)).unwrap();
  }
  project.write_file("my otp/lib/erl_interface-5.5/include/port.h", "#define PORT 1\n");
  project.write_file("cc.sh", HEADER_COMPILER);
  project.write_file("src/main.c", "int main(void) { return 0; }\n");

  let dir = project.temp.path().display();
  let config = PortConfig::parse(&format!(
    r#"
      platform = "x86_64-unknown-linux-gnu-64"
      runtime_root = '{dir}/my otp'
      port_env = [["CC", "sh {dir}/cc.sh"]]

      [[port_specs]]
      target = '{dir}/bin/prog'
      sources = ['{dir}/src/*.c']
    "#
  ))
  .unwrap();
  let resolver = TemplateResolver::for_config(&config).unwrap();
  let specs = build_specs(&config, &resolver, &[]).unwrap();

  let report = compile_and_link(&specs, &SystemShell::new(), &BuildOptions::new(project.temp.path()), &mut Vec::new())
    .await
    .unwrap();

  assert_eq!(report.linked, vec![project.path("bin/prog")]);
  assert_eq!(
    std::fs::read_to_string(project.path("bin/prog")).unwrap(),
    "#define PORT 1\nint main(void) { return 0; }\n"
  );
}
