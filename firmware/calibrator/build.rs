extern crate build_xw;

use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use build_xw::Defines;

const ROM_ENTRIES: &[(&str, &str)] = &[
    ("idle_loop1", "__RW_MGR_IDLE_LOOP1"),
    ("idle_loop2", "__RW_MGR_IDLE_LOOP2"),
    ("init_reset_0_cke_0", "__RW_MGR_INIT_RESET_0_CKE_0"),
    ("init_reset_0_cke_0_inloop", "__RW_MGR_INIT_RESET_0_CKE_0_inloop"),
    ("init_reset_1_cke_0", "__RW_MGR_INIT_RESET_1_CKE_0"),
    ("init_reset_1_cke_0_inloop_1", "__RW_MGR_INIT_RESET_1_CKE_0_inloop_1"),
    ("init_cke_0", "__RW_MGR_INIT_CKE_0"),
    ("init_cke_0_inloop", "__RW_MGR_INIT_CKE_0_inloop"),
    ("nop", "__RW_MGR_NOP"),
    ("zqcl", "__RW_MGR_ZQCL"),
    ("refresh", "__RW_MGR_REFRESH"),
    ("precharge_all", "__RW_MGR_PRECHARGE_ALL"),
    ("mrs0_dll_reset", "__RW_MGR_MRS0_DLL_RESET"),
    ("mrs0_user", "__RW_MGR_MRS0_USER"),
    ("mrs1", "__RW_MGR_MRS1"),
    ("mrs2", "__RW_MGR_MRS2"),
    ("mrs3", "__RW_MGR_MRS3"),
    ("emr", "__RW_MGR_EMR"),
    ("emr2", "__RW_MGR_EMR2"),
    ("emr3", "__RW_MGR_EMR3"),
    ("emr_ocd_enable", "__RW_MGR_EMR_OCD_ENABLE"),
    ("mr_dll_reset", "__RW_MGR_MR_DLL_RESET"),
    ("mr_calib", "__RW_MGR_MR_CALIB"),
    ("mr_user", "__RW_MGR_MR_USER"),
    ("mr63_reset", "__RW_MGR_MR63_RESET"),
    ("mr10_zqc", "__RW_MGR_MR10_ZQC"),
    ("mr1_calib", "__RW_MGR_MR1_CALIB"),
    ("mr1_user", "__RW_MGR_MR1_USER"),
    ("mr2", "__RW_MGR_MR2"),
    ("mr3", "__RW_MGR_MR3"),
    ("guaranteed_write", "__RW_MGR_GUARANTEED_WRITE"),
    ("read_b2b", "__RW_MGR_READ_B2B"),
    ("read_b2b_wait1", "__RW_MGR_READ_B2B_WAIT1"),
    ("read_b2b_wait2", "__RW_MGR_READ_B2B_WAIT2"),
    ("clear_dqs_enable", "__RW_MGR_CLEAR_DQS_ENABLE"),
    ("activate_0_and_1", "__RW_MGR_ACTIVATE_0_AND_1"),
    ("activate_0_and_1_wait1", "__RW_MGR_ACTIVATE_0_AND_1_WAIT1"),
    ("activate_0_and_1_wait2", "__RW_MGR_ACTIVATE_0_AND_1_WAIT2"),
];

/// Geometry constants the sequencer divides by.
const DIVISORS: &[&str] = &[
    "RW_MGR_MEM_VIRTUAL_GROUPS_PER_READ_DQS",
    "AFI_RATE_RATIO",
    "AFI_CLK_FREQ",
];

const GEOMETRY: &[(&str, &str)] = &[
    ("dq_per_read_dqs", "RW_MGR_MEM_DQ_PER_READ_DQS"),
    ("dq_per_write_dqs", "RW_MGR_MEM_DQ_PER_WRITE_DQS"),
    ("virtual_groups_per_read_dqs", "RW_MGR_MEM_VIRTUAL_GROUPS_PER_READ_DQS"),
    ("data_width", "RW_MGR_MEM_DATA_WIDTH"),
    ("data_mask_width", "RW_MGR_MEM_DATA_MASK_WIDTH"),
    ("read_dqs_width", "RW_MGR_MEM_IF_READ_DQS_WIDTH"),
    ("afi_rate_ratio", "AFI_RATE_RATIO"),
    ("afi_clk_freq", "AFI_CLK_FREQ"),
];

fn flag(defines: &Defines, name: &str) -> bool {
    defines.get(name).map_or(false, |value| value != 0)
}

fn protocol(defines: &Defines) -> &'static str {
    match (flag(defines, "DDR2"), flag(defines, "DDR3"), flag(defines, "LPDDR2")) {
        (true, false, false) => "Protocol::Ddr2",
        (false, true, false) => "Protocol::Ddr3",
        (false, false, true) => "Protocol::Lpddr2",
        _ => panic!("exactly one of DDR2, DDR3 and LPDDR2 must be defined to 1")
    }
}

fn groups(defines: &Defines) -> String {
    match (flag(defines, "M10_DQ_WIDTH_8"), flag(defines, "M10_DQ_WIDTH_16"),
           flag(defines, "M10_DQ_WIDTH_24")) {
        (true, false, false) => "GroupLayout::X8".to_owned(),
        (false, true, false) =>
            format!("GroupLayout::X16 {{ two_capture_clocks: {} }}",
                    flag(defines, "TW0_CAPTURE_CLOCKS")),
        (false, false, true) => "GroupLayout::X24".to_owned(),
        _ => panic!("exactly one of M10_DQ_WIDTH_8, _16 and _24 must be defined to 1")
    }
}

fn generate(defines: &Defines) -> String {
    let mut out = String::new();
    writeln!(out, "pub const CONFIG: Config = Config {{").unwrap();

    writeln!(out, "    layout: Layout {{").unwrap();
    writeln!(out, "        phy_mgr: {:#x},", defines.require("SEQUENCER_PHY_MGR_INST_BASE")).unwrap();
    writeln!(out, "        rw_mgr: {:#x},", defines.require("SEQUENCER_RW_MGR_INST_BASE")).unwrap();
    match defines.get("BASE_PLL_MGR") {
        Some(base) => writeln!(out, "        pll_mgr: {:#x},", base).unwrap(),
        None => writeln!(out, "        pll_mgr: DEFAULT_PLL_MGR,").unwrap()
    }
    writeln!(out, "    }},").unwrap();

    writeln!(out, "    rom: InstRom {{").unwrap();
    for &(field, name) in ROM_ENTRIES {
        writeln!(out, "        {}: {:#x},", field, defines.get(name).unwrap_or(0)).unwrap();
    }
    let waits = (0..4)
        .map(|i| format!("{:#x}", defines.get(&format!("__RW_MGR_GUARANTEED_WRITE_WAIT{}", i))
                                         .unwrap_or(0)))
        .collect::<Vec<_>>();
    writeln!(out, "        guaranteed_write_wait: [{}],", waits.join(", ")).unwrap();
    writeln!(out, "    }},").unwrap();

    writeln!(out, "    geometry: Geometry {{").unwrap();
    for &(field, name) in GEOMETRY {
        let value = if DIVISORS.contains(&name) {
            defines.require_nonzero(name)
        } else {
            defines.require(name)
        };
        writeln!(out, "        {}: {},", field, value).unwrap();
    }
    writeln!(out, "    }},").unwrap();

    writeln!(out, "    protocol: {},", protocol(defines)).unwrap();
    writeln!(out, "    groups: {},", groups(defines)).unwrap();
    writeln!(out, "}};").unwrap();
    out
}

fn main() {
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let board_dir = Path::new(&manifest_dir).join("../libboard_xw");
    println!("cargo:rustc-link-search={}", board_dir.display());
    println!("cargo:rustc-link-arg-bins=-Tprogram.ld");
    build_xw::rerun_if_changed(board_dir.join("program.ld"));

    let defines = match Defines::from_env("SEQUENCER_DEFINES") {
        Some(defines) => defines,
        None => {
            let path = Path::new(&manifest_dir).join("sequencer_defines.h");
            build_xw::rerun_if_changed(&path);
            Defines::parse(&fs::read_to_string(&path).unwrap())
        }
    };

    if defines.is_empty() {
        panic!("no #define constants found in the sequencer headers")
    }
    // The clock period is computed in whole picoseconds.
    if defines.require_nonzero("AFI_CLK_FREQ") > 1_000_000 {
        panic!("AFI_CLK_FREQ is in MHz and must not exceed 1000000")
    }

    let out_dir = env::var("OUT_DIR").unwrap();
    fs::write(Path::new(&out_dir).join("sequencer_config.rs"), generate(&defines)).unwrap();
}
