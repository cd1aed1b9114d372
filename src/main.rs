use std::env;
use std::process;

use mining_truck_simulator::metrics::MetricsCalculator;
use mining_truck_simulator::simulation::{Simulation, SimulationParams};

/// Parseo de CLI de un conteo: debe ser un entero sin signo válido.
fn parse_count(args: &[String], idx: usize, label: &str) -> Result<u32, String> {
    let raw = args
        .get(idx)
        .ok_or_else(|| format!("Falta el argumento <{}>", label))?;
    raw.parse()
        .map_err(|_| format!("Valor inválido para <{}>: {}", label, raw))
}

fn usage(bin: &str) -> String {
    format!(
        "Uso:\n  {bin} <num_camiones> <num_estaciones> [prefijo_csv]\n\
         Donde ambos conteos son enteros positivos. Si se indica un prefijo,\n\
         se escriben <prefijo>_camiones.csv y <prefijo>_estaciones.csv.\n\
         Ejemplos:\n  {bin} 30 3\n  {bin} 300 1 resultados"
    )
}

fn main() {
    // ---------- CLI ----------
    let args: Vec<String> = env::args().collect();
    let bin = args.first().map(String::as_str).unwrap_or("mining-truck-simulator");

    let num_trucks = parse_count(&args, 1, "num_camiones").unwrap_or_else(|e| {
        eprintln!("{}\nError: {}", usage(bin), e);
        process::exit(1);
    });
    let num_stations = parse_count(&args, 2, "num_estaciones").unwrap_or_else(|e| {
        eprintln!("{}\nError: {}", usage(bin), e);
        process::exit(1);
    });

    // La validación de los conteos ocurre antes de construir el controlador
    let params = SimulationParams::new(num_trucks, num_stations).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        process::exit(1);
    });

    // ---------- SIMULACION ----------
    let mut simulation = Simulation::new(params);
    let results = simulation.run();

    // ---------- REPORTE ----------
    let calculator = MetricsCalculator::new();
    println!("{}", calculator.generate_report(&results));

    if let Some(prefix) = args.get(3) {
        let truck_path = format!("{prefix}_camiones.csv");
        let station_path = format!("{prefix}_estaciones.csv");
        std::fs::write(&truck_path, calculator.generate_truck_csv(&results))
            .expect("No se pudo escribir el CSV de camiones");
        std::fs::write(&station_path, calculator.generate_station_csv(&results))
            .expect("No se pudo escribir el CSV de estaciones");
        println!("Archivos CSV generados:");
        println!("   - {truck_path}");
        println!("   - {station_path}");
    }
}
