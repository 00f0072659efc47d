// SPDX-License-Identifier: MIT

//! Built-in input for `textlens analyze` when no file is given

/// Spanish-language chemistry article on types of chemical bonds
pub const SAMPLE_TEXT: &str = r#"
Tipos de enlace químico
Existen tres tipos de enlace químico conocidos, dependiendo de la naturaleza de los átomos involucrados:

Enlace covalente. Ocurre entre átomos no metálicos y de cargas electromagnéticas semejantes (por lo general altas), que se unen y comparten algunos pares de electrones de su capa de valencia. Es el tipo de enlace predominante en las moléculas orgánicas y puede ser de tres tipos: simple (A-A), doble (A=A) y triple (A≡A), dependiendo de la cantidad de electrones compartidos.
Enlace iónico. Consiste en la atracción electrostática entre partículas con cargas eléctricas de signos contrarios llamadas iones (partícula cargada eléctricamente, que puede ser un átomo o molécula que ha perdido o ganado electrones, es decir, que no es neutro).
Enlace metálico. Se da únicamente entre átomos metálicos de un mismo elemento, que por lo general constituyen estructuras sólidas, sumamente compactas. Es un enlace fuerte, que une los núcleos atómicos entre sí, rodeados de sus electrones como en una nube.
Ejemplos de enlace químico
Algunos ejemplos de compuestos con enlace covalente:

Benceno (C6H6)
Metano (CH4)
Glucosa (C6H12O6)
Amoníaco (NH3)
Freón (CFC)
En todas las formas del carbono (C): carbón, diamantes, grafeno, etc.
Algunos ejemplos de compuestos con enlace iónico:

Óxido de magnesio (MgO)
Sulfato de cobre (CuSO4)
Ioduro de potasio (KI)
Cloruro de manganeso (MnCl2)
Carbonato de calcio (CaCO3)
Sulfuro de hierro (Fe2S3)
Algunos ejemplos de compuestos con enlace metálico:

Barras de hierro (Fe)
Yacimientos de cobre (Cu)
Barras de oro puro (Au)
Barras de plata pura (Ag)


Fuente: https://concepto.de/enlace-quimico/#ixzz8xQjCywVK
"#;
