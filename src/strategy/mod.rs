pub mod crossover;
