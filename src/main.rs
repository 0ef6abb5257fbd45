use clap::{Arg, ArgMatches, Command};
use impactsim::SimulationOutcome;
use impactsim::logging::{LogConfig, LogOutput, init_logging, level_for_verbosity, parse_log_level};
use impactsim::scenario::ScenarioConfig;
use impactsim::simulation::SimulationEngine;

fn main() {
    // コマンドライン引数の解析
    let matches = Command::new("impactsim")
        .version(env!("CARGO_PKG_VERSION"))
        .about("小惑星衝突シミュレーション (Asteroid Impact Simulation)")
        .long_about(
            "惑星重力下での小惑星の軌道を数値積分し、衝突地点と衝突エネルギーを推定します。\n\
             二体問題近似（大気・第三天体の影響なし）の単発計算です。",
        )
        .arg(
            Arg::new("scenario")
                .short('s')
                .long("scenario")
                .value_name("FILE")
                .help("シナリオファイル(.yaml)のパスを指定"),
        )
        .arg(
            Arg::new("info")
                .short('i')
                .long("info")
                .action(clap::ArgAction::SetTrue)
                .requires("scenario")
                .help("シナリオの情報のみ表示して終了"),
        )
        .arg(
            Arg::new("demo")
                .short('d')
                .long("demo")
                .action(clap::ArgAction::SetTrue)
                .conflicts_with("scenario")
                .help("入力フォームの初期値で実行"),
        )
        .arg(
            Arg::new("print-default")
                .long("print-default")
                .action(clap::ArgAction::SetTrue)
                .help("標準シナリオをYAMLで出力して終了"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(clap::ArgAction::Count)
                .help("詳細出力レベル (-v: 基本, -vv: 詳細, -vvv: デバッグ)"),
        )
        .arg(
            Arg::new("log-output")
                .long("log-output")
                .value_name("TARGET")
                .default_value("console")
                .help("ログ出力先 (console, file, both)"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .help("ログレベル (trace, debug, info, warn, error)"),
        )
        .arg(
            Arg::new("log-dir")
                .long("log-dir")
                .value_name("DIR")
                .default_value("logs")
                .help("ログファイルのディレクトリ"),
        )
        .get_matches();

    let verbose_level = matches.get_count("verbose");

    let _log_guard = match init_logging(&log_config(&matches, verbose_level)) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("エラー: ログ初期化に失敗しました: {}", e);
            std::process::exit(1);
        }
    };

    if matches.get_flag("print-default") {
        match ScenarioConfig::default().to_yaml() {
            Ok(yaml) => print!("{}", yaml),
            Err(e) => {
                eprintln!("エラー: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    let result = if matches.get_flag("demo") {
        println!("=== 標準シナリオで実行 ===");
        execute_scenario(ScenarioConfig::default(), verbose_level)
    } else if let Some(scenario_path) = matches.get_one::<String>("scenario") {
        run_scenario(scenario_path, matches.get_flag("info"), verbose_level)
    } else {
        show_default_help();
        Ok(())
    };

    if let Err(e) = result {
        eprintln!("エラー: {}", e);
        std::process::exit(1);
    }
}

fn log_config(matches: &ArgMatches, verbose_level: u8) -> LogConfig {
    let output = matches
        .get_one::<String>("log-output")
        .map(|s| {
            s.parse::<LogOutput>().unwrap_or_else(|e| {
                eprintln!("警告: {}. consoleを使用します", e);
                LogOutput::Console
            })
        })
        .unwrap_or(LogOutput::Console);
    let level = matches
        .get_one::<String>("log-level")
        .map(|s| parse_log_level(s))
        .unwrap_or_else(|| level_for_verbosity(verbose_level));

    LogConfig {
        level,
        output,
        log_dir: matches
            .get_one::<String>("log-dir")
            .cloned()
            .unwrap_or_else(|| "logs".to_string()),
        ..LogConfig::default()
    }
}

/// シナリオファイルを読み込んで実行
fn run_scenario(
    scenario_path: &str,
    info_only: bool,
    verbose_level: u8,
) -> Result<(), Box<dyn std::error::Error>> {
    let scenario = ScenarioConfig::from_file(scenario_path)?;

    if verbose_level > 0 {
        println!("シナリオファイル読み込み完了: {}", scenario_path);
    }

    if info_only {
        scenario.print_summary();
        return Ok(());
    }

    execute_scenario(scenario, verbose_level)
}

/// シナリオの実行
fn execute_scenario(
    scenario: ScenarioConfig,
    verbose_level: u8,
) -> Result<(), Box<dyn std::error::Error>> {
    scenario.print_summary();
    println!();

    // 欠落項目があれば計算せずに入力待ちとして扱う
    let params = match scenario.asteroid.to_parameters() {
        Ok(params) => params,
        Err(e) => {
            println!("Waiting for Input..... ({})", e);
            return Ok(());
        }
    };

    let engine = SimulationEngine::new(scenario.planet, verbose_level);
    let outcome = engine.run(&params)?;
    print_outcome(&outcome, verbose_level);

    Ok(())
}

fn print_outcome(outcome: &SimulationOutcome, verbose_level: u8) {
    let report = &outcome.report;
    println!("=== 計算結果 ===");
    println!("軌道サンプル数: {}", outcome.trajectory.len());
    println!("時間刻み: {:.1}秒", outcome.trajectory.step_size_s);
    println!("経過時間: {:.1}秒", outcome.trajectory.elapsed_s());
    println!(
        "最終位置: ({:.1}, {:.1}, {:.1}) km",
        report.final_position.x, report.final_position.y, report.final_position.z
    );
    println!(
        "衝突地点: 緯度 {:.4}度, 経度 {:.4}度",
        report.impact_site.latitude_deg, report.impact_site.longitude_deg
    );
    if verbose_level > 1 {
        println!("終了理由: {:?}", report.termination);
        println!(
            "戦略区分: {:?} / {:?}",
            report.mitigation.radius_class, report.mitigation.standoff_class
        );
    }
    println!();
    println!("{}", report.narrative());
}

/// デフォルトヘルプとシナリオ一覧を表示
fn show_default_help() {
    println!("使用方法:");
    println!("  impactsim [オプション]");
    println!();
    println!("オプション:");
    println!("  -s, --scenario <FILE>  シナリオファイルを指定して実行");
    println!("  -i, --info             シナリオ情報のみ表示");
    println!("  -d, --demo             入力フォームの初期値で実行");
    println!("      --print-default    標準シナリオをYAMLで出力");
    println!("  -v, --verbose          詳細出力 (複数指定で詳細レベル上昇)");
    println!("      --log-output <T>   ログ出力先 (console, file, both)");
    println!("  -h, --help             このヘルプを表示");
    println!();
    println!("利用可能なシナリオファイル:");
    println!("  scenarios/default_impact.yaml   - 入力フォームの初期値");
    println!("  scenarios/close_approach.yaml   - 近距離からの落下");
    println!("  scenarios/outbound_miss.yaml    - 高速で遠ざかる軌道");
    println!("  scenarios/incomplete_input.yaml - 入力欠落の確認用");
    println!();
    println!("例:");
    println!("  impactsim -s scenarios/default_impact.yaml");
    println!("  impactsim -s scenarios/outbound_miss.yaml -vv");
    println!("  impactsim -s scenarios/close_approach.yaml -i");
    println!("  impactsim --demo");
}
