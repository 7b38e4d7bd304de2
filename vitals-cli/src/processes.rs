use crate::client::ProcessInfo;
use colored::*;

pub fn print_processes(processes: &[ProcessInfo]) {
    println!("{:<8} {:>6} {:>6}  NAME", "PID", "CPU%", "MEM%");
    for p in processes {
        let cpu = format!("{:>6.1}", p.cpu_percent);
        let cpu = if p.cpu_percent >= 50.0 {
            cpu.yellow()
        } else {
            cpu.normal()
        };
        println!(
            "{:<8} {} {:>6.1}  {}",
            p.pid, cpu, p.memory_percent, p.name
        );
    }
}
